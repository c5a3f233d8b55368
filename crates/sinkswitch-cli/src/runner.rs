//! Wire config, database and device backends into the controllers.

use anyhow::{Context, Result};
use sinkswitch_core::{
    OutputSwitchController, OutputTarget, RendererController, RendererFlags, RendererRequest,
    StoreError,
};
use sinkswitch_db::Database;
use sinkswitch_device::{BluControl, BtStreamConfig, CommandLine, Systemctl};
use tracing::{debug, warn};

use crate::config::Config;
use crate::status::Report;

fn open_database(config: &Config) -> Result<Database> {
    let path = config.database.resolve_path()?;
    Database::open_at(path).context("Failed to open database")
}

fn active_session(db: &Database) -> Result<String> {
    let id = db
        .active_session_id()
        .context("Failed to read active session id")?
        .ok_or(StoreError::NoActiveSession)?;
    debug!(session = %id, "Active session");
    Ok(id)
}

/// Switch the output to `target`.
///
/// The target is validated before the database is opened.
///
/// # Errors
/// Returns an error if the database, the active session or a backend
/// command line cannot be set up. Controller failures come back as a
/// failure report instead.
pub fn switch_output(config: &Config, target: &str) -> Result<Report> {
    let target: OutputTarget = match target.parse() {
        Ok(target) => target,
        Err(e) => {
            warn!(error = %e, "Rejected output target");
            return Ok(Report::from(&e));
        }
    };

    let adapter = BluControl::new(CommandLine::new(config.bluetooth.control_command.clone())?);
    let writer = BtStreamConfig::new(config.bluetooth.stream_config.clone());
    let controller =
        OutputSwitchController::new(adapter, writer).with_settle(config.bluetooth.settle());

    let mut db = open_database(config)?;
    let id = active_session(&db)?;
    let mut session = db.open_session(&id).context("Failed to open session")?;

    match controller.switch_output(&mut session, target) {
        Ok(outcome) => {
            session.close().context("Failed to commit session")?;
            Ok(Report::from(outcome))
        }
        Err(e) => {
            warn!(error = %e, %target, "Output switch failed");
            Ok(Report::from(&e))
        }
    }
}

/// Turn a renderer on or off.
///
/// # Errors
/// Same as [`switch_output`].
pub fn toggle_renderer(config: &Config, service: &str, action: &str) -> Result<Report> {
    let request = match RendererRequest::parse(service, action) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejected renderer request");
            return Ok(Report::from(&e));
        }
    };

    let manager = Systemctl::new(CommandLine::new(config.renderers.service_command.clone())?);
    let controller = RendererController::new(manager, config.renderers.units.clone());

    let mut db = open_database(config)?;
    let id = active_session(&db)?;
    let mut session = db.open_session(&id).context("Failed to open session")?;

    match controller.toggle(&mut session, request) {
        Ok(outcome) => {
            session.close().context("Failed to commit session")?;
            Ok(Report::from(outcome))
        }
        Err(e) => {
            warn!(error = %e, service = %request.service, "Renderer toggle failed");
            Ok(Report::from(&e))
        }
    }
}

/// Read the renderer flags of the active session.
///
/// # Errors
/// Returns an error if the session cannot be opened or read.
pub fn renderer_status(config: &Config) -> Result<RendererFlags> {
    let manager = Systemctl::new(CommandLine::new(config.renderers.service_command.clone())?);
    let controller = RendererController::new(manager, config.renderers.units.clone());

    let mut db = open_database(config)?;
    let id = active_session(&db)?;
    let session = db.open_session(&id).context("Failed to open session")?;
    let flags = controller.status(&session)?;
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusTag;
    use std::path::Path;

    const SESSION: &str = "c0ffee";

    /// Config pointing every backend at shell snippets that log to `calls`.
    fn config(dir: &Path, bt_list: &str) -> Config {
        let calls = dir.join("calls");
        let mut config = Config::default();
        config.database.path = Some(dir.join("player.db"));
        config.bluetooth.settle_ms = 0;
        config.bluetooth.stream_config = dir.join("btstream.conf");
        config.bluetooth.control_command = vec![
            "sh".into(),
            "-c".into(),
            format!(
                "echo \"bt $*\" >> {calls}; if [ \"$1\" = -c ]; then printf '{bt_list}'; fi",
                calls = calls.display()
            ),
            "blu-control".into(),
        ];
        config.renderers.service_command = vec![
            "sh".into(),
            "-c".into(),
            format!("echo \"svc $*\" >> {}", calls.display()),
            "systemctl".into(),
        ];
        std::fs::write(
            &config.bluetooth.stream_config,
            "pcm.btstream {\n    type plug\n    device \"00:00:00:00:00:00\"\n}\n",
        )
        .unwrap();

        let db = Database::open_at(dir.join("player.db")).unwrap();
        db.create_session(SESSION).unwrap();
        db.set_active_session(SESSION).unwrap();
        config
    }

    fn calls(dir: &Path) -> String {
        std::fs::read_to_string(dir.join("calls")).unwrap_or_default()
    }

    fn stored(dir: &Path, param: &str) -> Option<String> {
        Database::open_at(dir.join("player.db")).unwrap().system_value(param).unwrap()
    }

    #[test]
    fn test_switch_to_bluetooth_and_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "** AA:BB:CC:DD:EE:FF Speaker\\n");

        let report = switch_output(&config, "Bluetooth").unwrap();
        assert_eq!(report.to_string(), "[AUDIOOUT_CHANGED] Bluetooth");
        assert_eq!(stored(dir.path(), "audioout").as_deref(), Some("Bluetooth"));

        let stream = std::fs::read_to_string(&config.bluetooth.stream_config).unwrap();
        assert!(stream.contains("    device \"AA:BB:CC:DD:EE:FF\"\n"));

        let report = switch_output(&config, "Bluetooth").unwrap();
        assert_eq!(report.status, StatusTag::AudiooutAlreadySet);

        let report = switch_output(&config, "Local").unwrap();
        assert_eq!(report.to_string(), "[AUDIOOUT_CHANGED] Local");
        assert_eq!(stored(dir.path(), "audioout").as_deref(), Some("Local"));

        assert_eq!(
            calls(dir.path()),
            "bt -c\nbt -C AA:BB:CC:DD:EE:FF\nbt -c\nbt -d AA:BB:CC:DD:EE:FF\n"
        );
    }

    #[test]
    fn test_session_known_only_to_system_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), "");
        let path = dir.path().join("fresh.db");
        config.database.path = Some(path.clone());

        // The player records the id in cfg_system without a sessions row
        Database::open_at(path.clone()).unwrap().set_active_session("k3j2h1").unwrap();

        let report = switch_output(&config, "Local").unwrap();
        assert_eq!(report.status, StatusTag::AudiooutAlreadySet);

        let report = toggle_renderer(&config, "upnp", "on").unwrap();
        assert_eq!(report.to_string(), "[RENDERER_ON] upnp");

        let db = Database::open_at(path).unwrap();
        assert!(db.session_exists("k3j2h1").unwrap());
        assert_eq!(db.system_value("upnpsvc").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_no_bluetooth_device() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "");

        let report = switch_output(&config, "Bluetooth").unwrap();
        assert_eq!(report.to_string(), "[AUDIOOUT_NO_BT]");
        assert_eq!(stored(dir.path(), "audioout").as_deref(), Some("Local"));
    }

    #[test]
    fn test_invalid_target_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), "");
        config.database.path = Some(dir.path().join("absent").join("other.db"));

        let report = switch_output(&config, "bluetooth").unwrap();
        assert_eq!(report.status, StatusTag::AudiooutInvalid);
        assert!(!dir.path().join("absent").exists());
        assert_eq!(calls(dir.path()), "");
    }

    #[test]
    fn test_missing_active_session_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "");
        Database::open_at(dir.path().join("player.db")).unwrap().set_active_session("").unwrap();

        let err = switch_output(&config, "Local").unwrap_err();
        assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::NoActiveSession)));
    }

    #[test]
    fn test_renderer_toggle_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "");

        let report = toggle_renderer(&config, "AirPlay", "on").unwrap();
        assert_eq!(report.to_string(), "[RENDERER_ON] airplay");
        assert_eq!(stored(dir.path(), "airplaysvc").as_deref(), Some("1"));

        let report = toggle_renderer(&config, "bluetooth", "off").unwrap();
        assert_eq!(report.to_string(), "[RENDERER_OFF] bluetooth");

        let report = toggle_renderer(&config, "spotify", "on").unwrap();
        assert_eq!(report.status, StatusTag::RendererInvalid);

        assert_eq!(
            calls(dir.path()),
            "svc start shairport-sync\nsvc stop bluealsa\nsvc stop bluetooth\n"
        );

        let flags = renderer_status(&config).unwrap();
        assert!(flags.airplay);
        assert!(!flags.bluetooth);
        assert!(!flags.upnp);
    }

    #[test]
    fn test_failed_unit_leaves_flag_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), "");
        config.renderers.service_command = vec![
            "sh".into(),
            "-c".into(),
            "echo 'unit not found' >&2; exit 5".into(),
            "systemctl".into(),
        ];

        let report = toggle_renderer(&config, "upnp", "on").unwrap();
        assert_eq!(report.status, StatusTag::RendererError);
        assert_eq!(stored(dir.path(), "upnpsvc").as_deref(), Some("0"));
    }
}
