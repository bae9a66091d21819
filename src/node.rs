//! A running node.
//!
//! [`Node`] owns the background tasks of one device: the boot prompt, the
//! sampling loop, the reminder and the radio receiver. Button presses are
//! routed through it.

use futures::future::join_all;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::NodeConfig;
use crate::error::Result;
use crate::mode::{Button, Mode, MODE_PROMPT};
use crate::state::{NodeContext, NodeState, Peripherals};
use crate::{receiver, reminder, sampler};

/// A booted node and its tasks.
pub struct Node {
    ctx: Arc<NodeContext>,
    tasks: Vec<JoinHandle<()>>,
}

impl Node {
    /// Validate the configuration and boot the node.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: NodeConfig, peripherals: Peripherals) -> Result<Self> {
        config.validate()?;

        info!(
            "Booting node {:08X} on radio group {}",
            config.radio_serial, config.radio_group
        );

        let ctx = Arc::new(NodeContext::new(config, peripherals));

        let prompt = {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                let actuator = &ctx.peripherals.actuator;
                actuator.show_text(MODE_PROMPT).await;
                actuator.clear().await;
            })
        };

        let tasks = vec![
            prompt,
            receiver::spawn(ctx.clone()),
            sampler::spawn(ctx.clone()),
            reminder::spawn(ctx.clone()),
        ];

        Ok(Self { ctx, tasks })
    }

    /// The shared context.
    pub fn context(&self) -> &Arc<NodeContext> {
        &self.ctx
    }

    /// The current mode.
    pub fn mode(&self) -> Mode {
        self.ctx.mode.current()
    }

    /// Copy of the node's shared state.
    pub fn state(&self) -> NodeState {
        self.ctx.snapshot()
    }

    /// Press a button.
    ///
    /// Returns the selected mode if this press resolved it.
    pub async fn press(&self, button: Button) -> Option<Mode> {
        let selected = self.ctx.mode.press(button);
        if selected.is_some() {
            self.ctx.peripherals.actuator.clear().await;
        }
        self.ctx.interrupt();
        selected
    }

    /// Stop every task and wait for them to finish.
    pub async fn shutdown(self) {
        info!("Shutting down node in {} mode", self.mode());

        for task in &self.tasks {
            task.abort();
        }
        join_all(self.tasks).await;
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("ctx", &self.ctx)
            .field("tasks", &self.tasks.len())
            .finish()
    }
}
