use std::io;
use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Applied when `RUST_LOG` names a level only, e.g. `RUST_LOG=debug`, so the
/// output stays limited to this crate.
static CRATE_TARGET: &str = "simple_script";

fn directives(value: &str) -> String {
    if value.contains('=') || value.contains(',') {
        value.to_owned()
    } else {
        format!("{}={}", CRATE_TARGET, value)
    }
}

/// Sends events to stderr, leaving stdout to program output. Nothing is
/// installed unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let value = match std::env::var("RUST_LOG") {
            Ok(value) => value,
            Err(_) => return,
        };

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .with(EnvFilter::new(directives(&value)))
            .try_init();
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_directives() {
        let cases = vec![
            ("debug", "simple_script=debug"),
            ("simple_script::parser=trace", "simple_script::parser=trace"),
            ("warn,simple_script=info", "warn,simple_script=info"),
        ];

        for (value, expected) in cases.into_iter() {
            assert_eq!(directives(value), expected, "{}", value);
        }
    }
}
