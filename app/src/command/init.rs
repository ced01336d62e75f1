use gemchat_config::Config;

/// Strategy for executing the Init command.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, (): Self::Input) -> anyhow::Result<()> {
        Config::create_config()
    }
}
