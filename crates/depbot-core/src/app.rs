use depbot_config::{Config, ConfigError};
use depbot_database_interface::DbService;
use depbot_ghapi_interface::ApiService;
use depbot_lock_interface::LockService;
use depbot_models::MonorepoDefinitions;
use shaku::HasComponent;

use crate::{jobs::Job, use_cases::jobs::ProcessJobInterface, CoreContext, CoreModule, Result};

/// Long-lived services of a process running the engine.
pub struct AppContext {
    pub config: Config,
    pub core_module: CoreModule,
    pub monorepos: MonorepoDefinitions,
    pub db_service: Box<dyn DbService>,
    pub api_service: Box<dyn ApiService>,
    pub lock_service: Box<dyn LockService>,
}

impl AppContext {
    /// Validate the configuration and load the monorepo catalogue.
    pub fn new_with_adapters(
        config: Config,
        core_module: CoreModule,
        db_service: Box<dyn DbService>,
        api_service: Box<dyn ApiService>,
        lock_service: Box<dyn LockService>,
    ) -> core::result::Result<Self, ConfigError> {
        config.validate()?;
        let monorepos = MonorepoDefinitions::from_config(&config.monorepo.definitions)
            .map_err(|source| ConfigError::InvalidMonorepoDefinitions { source })?;

        Ok(Self {
            config,
            core_module,
            monorepos,
            db_service,
            api_service,
            lock_service,
        })
    }

    pub fn as_core_context(&self) -> CoreContext<'_> {
        CoreContext {
            config: &self.config,
            core_module: &self.core_module,
            monorepos: &self.monorepos,
            api_service: self.api_service.as_ref(),
            db_service: self.db_service.as_ref(),
            lock_service: self.lock_service.as_ref(),
        }
    }

    /// Run one queued job, returning the jobs to schedule next.
    pub async fn process_job(&self, name: &str, payload: serde_json::Value) -> Result<Vec<Job>> {
        let process_job: &dyn ProcessJobInterface = self.core_module.resolve_ref();
        process_job
            .run(&self.as_core_context(), name, payload)
            .await
    }
}
