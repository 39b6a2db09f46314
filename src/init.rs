use crate::handler::LogHandler;
use crate::layer::HandlerLayer;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration for the tracing layer.
///
/// **Fields**
/// - `level`: when set, only events at this level or more severe are
///   forwarded to the handler; `None` forwards everything.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt` layer is
///   stacked on top of [`HandlerLayer`] so events also print to the
///   console.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub level: Option<Level>,
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            level: None,
            enable_stdout: true,
        }
    }
}

/// Initialize the global `tracing` subscriber using the provided handler
/// and [`LayerConfig`].
///
/// **Parameters**
/// - `handler`: implementation of [`LogHandler`] that will receive every
///   captured event.
/// - `config`: [`LayerConfig`] controlling level filtering and console
///   echo.
///
/// **Effects**
///
/// This installs a [`Registry`] combined with [`HandlerLayer`] as the
/// global default subscriber, so all `tracing` events in the process are
/// observed by the layer and written out on the emitting thread.
pub fn init_tracing_with_config(handler: Arc<dyn LogHandler>, config: LayerConfig) {
    let mut layer = HandlerLayer::new(handler);
    if let Some(level) = config.level {
        layer = layer.with_level(level);
    }

    // The two subscriber shapes have different types, so each branch
    // installs its own.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
    }
}

/// Initialize tracing with sensible defaults.
///
/// **Parameters**
/// - `handler`: implementation of [`LogHandler`] that will receive every
///   captured event.
///
/// **Behavior**
///
/// Equivalent to calling [`init_tracing_with_config`] with
/// [`LayerConfig::default`]. This is the recommended entrypoint for
/// typical services.
pub fn init_tracing(handler: Arc<dyn LogHandler>) {
    init_tracing_with_config(handler, LayerConfig::default());
}
