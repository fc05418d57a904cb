//! Config Commands

use crate::cli::ConfigCommand;
use crate::models::settings::SettingsUpdate;
use crate::storage::config::ConfigService;
use crate::utils::error::AppResult;

pub fn run(command: ConfigCommand) -> AppResult<()> {
    let mut config_service = ConfigService::new()?;

    match command {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(config_service.get_config())?);
            Ok(())
        }
        ConfigCommand::Set {
            base_url,
            model,
            generation_timeout,
            publish_url,
            workflow_id,
            publish_timeout,
            prompts_dir,
        } => {
            let updated = config_service.update_config(SettingsUpdate {
                base_url,
                model,
                generation_timeout_secs: generation_timeout,
                publish_url,
                workflow_id,
                publish_timeout_secs: publish_timeout,
                prompts_dir,
            })?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
            Ok(())
        }
    }
}
