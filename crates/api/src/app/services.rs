//! Infrastructure wiring: the in-memory stores behind the gate's ports.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use gatehouse_auth::{EndpointPatterns, ForceLoginFlags, Gate, Settings, SettingsStore};
use gatehouse_core::{GateResult, UserId};
use gatehouse_infra::{
    AppConfig, ContentDirectory, EditorRegistry, NonceRegistry, OptionTable, ResourceMeta,
    SessionRegistry, SiteSeed, activate, import_options, read_json_file,
};

pub struct AppServices {
    pub config: AppConfig,
    pub content: ContentDirectory,
    pub options: OptionTable,
    pub meta: ResourceMeta,
    pub sessions: SessionRegistry,
    pub nonces: NonceRegistry,
    pub editors: EditorRegistry,
    pub endpoints: EndpointPatterns,
}

impl AppServices {
    /// Wire services for `seed` and set the force-login flags it lists.
    pub fn from_seed(config: AppConfig, seed: &SiteSeed) -> GateResult<Self> {
        let content = ContentDirectory::from_seed(&config.site_url, seed)?;
        let meta = ResourceMeta::in_memory();
        for id in &seed.forced {
            meta.set_flag(*id, true);
        }

        Ok(Self {
            sessions: SessionRegistry::in_memory(config.session_ttl),
            config,
            content,
            options: OptionTable::in_memory(),
            meta,
            nonces: NonceRegistry::in_memory(),
            editors: EditorRegistry::in_memory(),
            endpoints: EndpointPatterns::default(),
        })
    }

    /// Settings for one request. `None` means the store is unreadable and
    /// the gate should stand aside.
    pub fn settings(&self) -> Option<Settings> {
        match self.options.load() {
            Ok(settings) => Some(settings),
            Err(err) => {
                tracing::warn!(error = %err, "gate settings unreadable; failing open");
                None
            }
        }
    }

    pub fn gate<'a>(&'a self, settings: &'a Settings) -> Gate<'a> {
        Gate {
            settings,
            endpoints: &self.endpoints,
            directory: &self.content,
            commerce: &self.content,
            flags: &self.meta,
        }
    }

    /// Log in a user with edit rights and return their session token.
    pub fn start_editor_session(&self, user_id: UserId) -> String {
        self.editors.grant(user_id);
        self.sessions.start(user_id, Utc::now())
    }
}

/// Build services from configuration: content seed (demo shop when unset)
/// and initial option values.
pub fn build_services(config: AppConfig) -> anyhow::Result<Arc<AppServices>> {
    let seed = match &config.site_seed {
        Some(path) => {
            let document = read_json_file(path).with_context(|| format!("loading site seed {}", path.display()))?;
            SiteSeed::from_json(document)?
        }
        None => {
            tracing::info!("no site seed configured; serving the demo shop");
            SiteSeed::demo()
        }
    };

    let options = config.options.clone();
    let services = AppServices::from_seed(config, &seed).context("wiring services")?;

    if let Some(path) = options {
        let document = read_json_file(&path).with_context(|| format!("loading options {}", path.display()))?;
        let imported = import_options(&services.options, &document)?;
        tracing::info!(count = imported, path = %path.display(), "options imported");
    }
    activate(&services.options)?;

    Ok(Arc::new(services))
}
