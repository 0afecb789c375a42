use polymd::core::models::polymer::PolymerSpec;
use polymd::engine::config::PrepareConfig;

pub struct AppConfig {
    pub samples: Vec<PolymerSpec>,
    pub core_config: PrepareConfig,
}
