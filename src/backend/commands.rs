use super::{decode, read_body, ClientError, HttpBackend};
use crate::command::{AcceptedCommand, Command, CommandSink};

const COMMANDS_PATH: &str = "commands/";

/// Submits control commands to the backend.
#[derive(Debug, Clone)]
pub struct CommandClient {
    backend: HttpBackend,
}

impl CommandClient {
    pub fn new(backend: HttpBackend) -> Self {
        Self { backend }
    }

    pub async fn submit(&self, command: &Command) -> Result<AcceptedCommand, ClientError> {
        let url = self.backend.url(COMMANDS_PATH);
        log::debug!("POST {} {:?}", url, command);

        let response = self.backend.http.post(&url).json(command).send().await?;
        let body = read_body(response).await?;
        decode(&body)
    }
}

impl CommandSink for CommandClient {
    async fn submit(&self, command: &Command) -> Result<AcceptedCommand, ClientError> {
        CommandClient::submit(self, command).await
    }
}
