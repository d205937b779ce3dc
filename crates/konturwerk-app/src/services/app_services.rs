// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: owns the configuration and the service clients and
// hands them to the Dioxus UI.
//
// HTTP clients are built lazily from the current configuration and dropped
// whenever the configuration is saved, so a new service URL or timeout takes
// effect on the next request.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use konturwerk_bridge::PlatformBridge;
use konturwerk_client::{ExportClient, ProcessingClient};
use konturwerk_core::AppConfig;
use konturwerk_core::error::Result;
use konturwerk_core::params::ParameterSet;
use tracing::{debug, info};

use super::data_dir;

#[derive(Clone)]
struct Clients {
    processing: ProcessingClient,
    export: ExportClient,
}

impl Clients {
    fn build(config: &AppConfig) -> Result<Self> {
        let timeout = config.request_timeout();
        Ok(Self {
            processing: ProcessingClient::new(&config.service_url, timeout)?,
            export: ExportClient::new(&config.service_url, timeout)?,
        })
    }
}

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
///
/// All fields are cheaply cloneable (Arc-wrapped) so that the struct can be
/// passed into closures and async blocks without lifetime issues.
#[derive(Clone)]
pub struct AppServices {
    data_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
    clients: Arc<Mutex<Option<Clients>>>,
}

impl AppServices {
    /// Initialise all services.  Call once at app startup.
    pub fn init() -> Result<Self> {
        Self::open(data_dir::data_dir()?)
    }

    /// Services rooted in a scratch directory, for when the regular data
    /// directory is unusable.
    pub fn fallback() -> Result<Self> {
        Self::open(data_dir::temp_dir()?)
    }

    /// Services persisting their configuration in `dir`.
    pub fn open(dir: PathBuf) -> Result<Self> {
        info!(path = %dir.display(), "initialising app services");
        let config = AppConfig::load_or_default(&dir);
        Ok(Self {
            data_dir: dir,
            config: Arc::new(Mutex::new(config)),
            clients: Arc::new(Mutex::new(None)),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // -- Configuration -------------------------------------------------------

    /// Current configuration.
    pub fn config(&self) -> AppConfig {
        self.config.lock().expect("config lock poisoned").clone()
    }

    /// Persist new settings.
    ///
    /// The service URL is checked by building clients for it first; an
    /// unusable URL is rejected and the previous settings stay in force.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        let clients = Clients::build(config)?;
        config.save(&self.data_dir)?;
        *self.config.lock().expect("config lock poisoned") = config.clone();
        *self.clients.lock().expect("clients lock poisoned") = Some(clients);
        info!(service_url = %config.service_url, "configuration saved");
        Ok(())
    }

    /// Persist `params` as the values the form starts with next launch.
    pub fn save_default_parameters(&self, params: ParameterSet) -> Result<()> {
        params.validate()?;
        let mut config = self.config();
        config.default_parameters = params;
        self.save_config(&config)
    }

    // -- Remote service ------------------------------------------------------

    fn clients(&self) -> Result<Clients> {
        let mut guard = self.clients.lock().expect("clients lock poisoned");
        if let Some(clients) = guard.as_ref() {
            return Ok(clients.clone());
        }
        let clients = Clients::build(&self.config())?;
        *guard = Some(clients.clone());
        Ok(clients)
    }

    /// Client for the process-image endpoint under the current settings.
    pub fn processing(&self) -> Result<ProcessingClient> {
        Ok(self.clients()?.processing)
    }

    /// Client for the export-dxf endpoint under the current settings.
    pub fn export(&self) -> Result<ExportClient> {
        Ok(self.clients()?.export)
    }

    // -- Platform ------------------------------------------------------------

    /// Directory exported drawings are written to when no dialog is shown.
    pub fn download_dir(&self) -> Result<PathBuf> {
        match self.config().download_dir {
            Some(dir) => {
                std::fs::create_dir_all(&dir)?;
                Ok(dir)
            }
            None => data_dir::subdir(&self.data_dir, "exports"),
        }
    }

    /// Camera and download target for this platform.
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    pub fn bridge(&self) -> Result<Box<dyn PlatformBridge>> {
        use konturwerk_bridge::DirectorySink;

        use super::desktop::{DesktopBridge, DownloadTarget};

        let target = if self.config().ask_where_to_save {
            DownloadTarget::AskEachTime
        } else {
            DownloadTarget::Directory(DirectorySink::new(self.download_dir()?))
        };
        let bridge = DesktopBridge::new(target);
        debug!(platform = bridge.platform_name(), "platform bridge ready");
        Ok(Box::new(bridge))
    }

    /// Camera and download target for this platform.
    #[cfg(any(target_os = "ios", target_os = "android"))]
    pub fn bridge(&self) -> Result<Box<dyn PlatformBridge>> {
        let bridge = konturwerk_bridge::platform_bridge();
        debug!(platform = bridge.platform_name(), "platform bridge ready");
        Ok(bridge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use konturwerk_core::error::KonturwerkError;
    use konturwerk_core::params::ParameterStore;

    #[test]
    fn saved_config_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::open(dir.path().to_path_buf()).unwrap();

        let mut config = svc.config();
        config.service_url = "http://contours.local:8080".into();
        config.request_timeout_secs = 12;
        svc.save_config(&config).unwrap();

        let reopened = AppServices::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.config().request_timeout_secs, 12);
        assert_eq!(
            reopened.processing().unwrap().url().as_str(),
            "http://contours.local:8080/process-image"
        );
    }

    #[test]
    fn saving_rebuilds_clients() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::open(dir.path().to_path_buf()).unwrap();
        let before = svc.export().unwrap().url().clone();

        let mut config = svc.config();
        config.service_url = "https://example.org/api/".into();
        svc.save_config(&config).unwrap();

        let after = svc.export().unwrap().url().clone();
        assert_ne!(before, after);
        assert_eq!(after.host_str(), Some("example.org"));
    }

    #[test]
    fn unusable_url_is_rejected_and_nothing_changes() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::open(dir.path().to_path_buf()).unwrap();
        let original = svc.config();

        let mut config = original.clone();
        config.service_url = "ftp://nope".into();
        let err = svc.save_config(&config).unwrap_err();

        assert!(matches!(err, KonturwerkError::Config(_)));
        assert_eq!(svc.config(), original);
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn default_parameters_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::open(dir.path().to_path_buf()).unwrap();

        let mut store = ParameterStore::new();
        store.set("thresholdValue", "200").unwrap();
        svc.save_default_parameters(store.get()).unwrap();

        let reopened = AppServices::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.config().default_parameters, store.get());
    }

    #[test]
    fn ask_where_to_save_still_yields_a_desktop_bridge() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::open(dir.path().to_path_buf()).unwrap();
        let mut config = svc.config();
        config.ask_where_to_save = true;
        svc.save_config(&config).unwrap();

        assert_eq!(svc.bridge().unwrap().platform_name(), "Desktop");
        assert!(!dir.path().join("exports").exists());
    }

    #[test]
    fn exports_default_to_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(svc.download_dir().unwrap(), dir.path().join("exports"));
    }
}
