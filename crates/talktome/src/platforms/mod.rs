use platform_client::PlatformClient;
use platform_client_mock::{MockPlatform, MOCK_PLATFORM_ID};

pub const DEFAULT_PLATFORM_ID: &str = MOCK_PLATFORM_ID;
pub const PLATFORM_ENV_VAR: &str = "TALKTOME_PLATFORM";

pub fn client_from_env() -> Result<Box<dyn PlatformClient>, String> {
    let platform_id = std::env::var(PLATFORM_ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    client_for_id(platform_id.as_deref().unwrap_or(DEFAULT_PLATFORM_ID))
}

pub fn client_for_id(platform_id: &str) -> Result<Box<dyn PlatformClient>, String> {
    match platform_id {
        DEFAULT_PLATFORM_ID => Ok(Box::new(MockPlatform::default())),
        unknown => Err(format!(
            "Unsupported platform '{unknown}'. Available platforms: {DEFAULT_PLATFORM_ID}"
        )),
    }
}
