//! Plugin parameter parsing
//!
//! protoc hands the plugin a raw `key=value,key=value` string
//! (`--ts_opt=unary_rpc_promise=true,grpc_package=@grpc/grpc-js`).
//! Parsing is lenient: unknown keys and malformed tokens are ignored.

use std::str::FromStr;

/// Default module the generated clients import the gRPC runtime from
pub const DEFAULT_GRPC_PACKAGE: &str = "@grpc/grpc-js";

/// Flavour of generated service code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Callback-based `@grpc/grpc-js` clients (default)
    #[default]
    GrpcJs,
    /// `@grpc/grpc-js` clients whose unary calls return promises
    Async,
}

impl FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grpc-js" => Ok(Style::GrpcJs),
            "async" => Ok(Style::Async),
            other => Err(format!("unknown style `{}`", other)),
        }
    }
}

/// Recognized plugin options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Generate promise-returning unary client calls
    pub unary_rpc_promise: bool,
    /// Module specifier of the gRPC runtime
    pub grpc_package: String,
    /// Service code flavour
    pub style: Style,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            unary_rpc_promise: false,
            grpc_package: DEFAULT_GRPC_PACKAGE.to_string(),
            style: Style::default(),
        }
    }
}

impl Options {
    /// Parse a raw plugin parameter string
    pub fn parse(raw: &str) -> Self {
        let mut options = Options::default();

        for token in raw.split(',') {
            let (key, value) = match token.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (token, None),
            };

            match key {
                // boolean keys: only a literal `false` turns them off
                "unary_rpc_promise" => options.unary_rpc_promise = value != Some("false"),
                "grpc_package" => {
                    if let Some(value) = value {
                        options.grpc_package = value.to_string();
                    }
                }
                "style" => match value.map(str::parse::<Style>) {
                    Some(Ok(style)) => options.style = style,
                    Some(Err(e)) => tracing::warn!(error = %e, "ignoring style option"),
                    None => {}
                },
                "" => {}
                other => tracing::debug!(key = other, "ignoring unrecognized option"),
            }
        }

        options
    }

    /// Whether unary client calls should return promises
    pub fn promise_unary_calls(&self) -> bool {
        self.unary_rpc_promise || self.style == Style::Async
    }
}
