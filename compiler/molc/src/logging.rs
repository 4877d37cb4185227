//! Log subscriber setup.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a subscriber when `RUST_LOG` is set. Safe to call more than once.
///
/// `MOL_LOG_TREE=1` renders nested spans as a tree instead of flat lines.
/// Logs always go to stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }

        let tree = std::env::var_os("MOL_LOG_TREE").is_some_and(|v| v == "1");
        let flat_layer = (!tree).then(|| {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr)
        });
        let tree_layer = tree.then(|| {
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true)
        });

        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(flat_layer)
            .with(tree_layer)
            .init();
    });
}
