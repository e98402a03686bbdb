use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::{Config, Engine, MarketflowError, Result, runner::StageRunner};

/// Builder for [`Engine`] instances.
pub struct EngineBuilder {
    config: Config,
    rt: Option<Arc<Runtime>>,
    runner: Option<Arc<dyn StageRunner>>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            config: Config::default(),
            rt: None,
            runner: None,
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(
        mut self,
        config: Config,
    ) -> Self {
        self.config = config;
        self
    }

    /// Share an existing tokio runtime instead of owning a new one.
    pub fn runtime(
        mut self,
        runtime: Arc<Runtime>,
    ) -> Self {
        self.rt = Some(runtime);
        self
    }

    /// Override the stage runner the configuration would select.
    ///
    /// Tests use this to inject a mock with forced failures.
    pub fn runner(
        mut self,
        runner: Arc<dyn StageRunner>,
    ) -> Self {
        self.runner = Some(runner);
        self
    }

    pub fn build(&self) -> Result<Engine> {
        let runtime = match &self.rt {
            Some(rt) => rt.clone(),
            None => Arc::new(
                Builder::new_multi_thread()
                    .worker_threads(self.config.async_worker_thread_number.into())
                    .enable_all()
                    .build()
                    .map_err(|e| MarketflowError::Engine(e.to_string()))?,
            ),
        };

        Engine::new_with(&self.config, runtime, self.runner.clone())
    }
}
