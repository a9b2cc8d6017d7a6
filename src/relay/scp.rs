use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::Command;

use log::{debug, info};
use tempfile::NamedTempFile;

use super::{ConfigFetcher, RelayError};

pub const DEFAULT_REMOTE_CONFIG_PATH: &str = "/etc/xray/config.json";
pub const DEFAULT_SSH_USER: &str = "root";
const CONNECT_TIMEOUT_SECS: u32 = 10;

/// Downloads the config with `scp`, authenticating with an in-memory
/// OpenSSH private key.
#[derive(Clone)]
pub struct ScpFetcher {
    private_key: String,
    remote_path: String,
    user: String,
    scp_bin: String,
}

impl std::fmt::Debug for ScpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScpFetcher")
            .field("remote_path", &self.remote_path)
            .field("user", &self.user)
            .field("scp_bin", &self.scp_bin)
            .finish_non_exhaustive()
    }
}

impl ScpFetcher {
    pub fn new(private_key: impl Into<String>) -> Self {
        ScpFetcher {
            private_key: private_key.into(),
            remote_path: DEFAULT_REMOTE_CONFIG_PATH.to_string(),
            user: DEFAULT_SSH_USER.to_string(),
            scp_bin: "scp".to_string(),
        }
    }

    pub fn remote_path(mut self, remote_path: impl Into<String>) -> Self {
        self.remote_path = remote_path.into();
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn scp_bin(mut self, scp_bin: impl Into<String>) -> Self {
        self.scp_bin = scp_bin.into();
        self
    }

    /// The key is written to an owner-only temp file that is removed when
    /// the returned handle drops.
    fn write_key(&self) -> Result<NamedTempFile, RelayError> {
        let mut key_file = NamedTempFile::new()?;
        key_file.write_all(self.private_key.trim_end().as_bytes())?;
        key_file.write_all(b"\n")?;
        key_file.flush()?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(key_file.path(), std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(key_file)
    }
}

impl ConfigFetcher for ScpFetcher {
    fn fetch(&self, host: &str, dest: &Path) -> Result<Vec<u8>, RelayError> {
        let key_file = self.write_key()?;
        let source = format!("{}@{}:{}", self.user, host, self.remote_path);
        let args = [
            "-i".to_string(),
            key_file.path().display().to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-o".to_string(),
            "UserKnownHostsFile=/dev/null".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", CONNECT_TIMEOUT_SECS),
            source.clone(),
            dest.display().to_string(),
        ];
        let command = format!("{} {}", self.scp_bin, args.join(" "));
        debug!("Running {}", command);

        let output = Command::new(&self.scp_bin)
            .args(&args)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => RelayError::Transfer {
                    command: command.clone(),
                    output: format!("{} not found in PATH", self.scp_bin),
                },
                _ => RelayError::Io(e),
            })?;

        if !output.status.success() {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(RelayError::Transfer {
                command,
                output: text,
            });
        }

        let content = std::fs::read(dest)?;
        info!("Downloaded {} to {}", source, dest.display());
        Ok(content)
    }
}
