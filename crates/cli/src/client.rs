//! Tinc client construction

use meshinvite_common::{Config, InviteManager, TincControl};

/// Manager driving the real `tinc` binary
pub type Manager = InviteManager<TincControl>;

/// Build a manager from loaded configuration
pub fn connect(config: &Config) -> Manager {
    let control = TincControl::new(&config.tinc);
    tracing::debug!(
        "Using tinc binary {} with params {:?}",
        config.tinc.bin,
        config.tinc.params
    );
    InviteManager::new(control, config.invite.clone())
}
