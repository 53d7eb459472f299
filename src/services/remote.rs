use crate::error::{EkrError, Result};
use crate::events::{ModeState, PollOutcome};
use crate::services::command_builder::CommandArgs;
use crate::services::dispatch::{command_header, ConfigDispatch};
use crate::services::windowing::{WindowingDeviceDirectory, WindowingQuery};
use crate::trace_if_enabled;
use crate::utils::DeviceFinder;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Один ExpressKey Remote: идентичность, текущий режим и команды по режимам
#[derive(Debug)]
pub struct Remote {
    mode_path: PathBuf,
    event_path: PathBuf,
    windowing_id: String,
    mode: ModeState,
    // Собственная таблица у каждого пульта
    mode_commands: BTreeMap<i64, Vec<CommandArgs>>,
}

impl Remote {
    /// Создать пульт для файла remote_mode.
    ///
    /// Ошибка, если не найден event-узел. Отсутствие устройства X11 не
    /// ошибка: id остаётся пустым.
    pub fn new(mode_path: impl Into<PathBuf>, windowing: &dyn WindowingQuery) -> Result<Self> {
        let mode_path = mode_path.into();
        info!("Создание пульта для {:?}", mode_path);

        let event_path = DeviceFinder::derive_event_path(&mode_path)?;
        DeviceFinder::describe_event_node(&event_path);

        let windowing_id = WindowingDeviceDirectory::new(windowing)
            .resolve_windowing_id(&event_path)
            .unwrap_or_default();

        if windowing_id.is_empty() {
            warn!(
                "Для {:?} не найдено устройство X11, команды xsetwacom не подействуют",
                event_path
            );
        } else {
            info!("Пульт {:?}: {:?}, устройство X11 {}", mode_path, event_path, windowing_id);
        }

        Ok(Self::with_identity(mode_path, event_path, windowing_id))
    }

    pub fn with_identity(mode_path: PathBuf, event_path: PathBuf, windowing_id: String) -> Self {
        Self {
            mode_path,
            event_path,
            windowing_id,
            mode: ModeState::Uninitialized,
            mode_commands: BTreeMap::new(),
        }
    }

    pub fn mode_path(&self) -> &Path {
        &self.mode_path
    }

    #[cfg(test)]
    pub fn event_path(&self) -> &Path {
        &self.event_path
    }

    #[cfg(test)]
    pub fn windowing_id(&self) -> &str {
        &self.windowing_id
    }

    #[cfg(test)]
    pub fn mode(&self) -> ModeState {
        self.mode
    }

    /// Задать команды для режима; повторный вызов заменяет прежние.
    ///
    /// Каждая команда дополняется префиксом `xsetwacom set <id>`.
    pub fn set_mode_commands(&mut self, mode: i64, commands: Vec<CommandArgs>) {
        let commands = commands
            .into_iter()
            .map(|args| command_header(&self.windowing_id).into_iter().chain(args).collect())
            .collect();
        self.mode_commands.insert(mode, commands);
    }

    #[cfg(test)]
    pub fn mode_commands(&self, mode: i64) -> Option<&[CommandArgs]> {
        self.mode_commands.get(&mode).map(Vec::as_slice)
    }

    /// Прочитать режим и, если он изменился, выполнить команды нового режима.
    ///
    /// Ошибка чтения или разбора не меняет сохранённый режим.
    pub fn poll(&mut self, dispatch: &dyn ConfigDispatch) -> Result<PollOutcome> {
        let current = self.read_mode().inspect_err(|e| error!("{}", e))?;

        let outcome = if self.mode.differs_from(current) {
            PollOutcome::Changed { from: self.mode, to: current }
        } else {
            PollOutcome::Unchanged(current)
        };
        self.mode = ModeState::Known(current);

        if outcome.is_changed() {
            info!("Пульт {:?} ({:?}): {}", self.mode_path, self.event_path, outcome);
            self.run_commands(current, dispatch);
        } else {
            trace_if_enabled!("Пульт {:?}: {}", self.mode_path, outcome);
        }

        Ok(outcome)
    }

    fn read_mode(&self) -> Result<i64> {
        let raw = fs::read_to_string(&self.mode_path).map_err(|source| EkrError::ModeRead {
            path: self.mode_path.clone(),
            source,
        })?;

        raw.trim().parse().map_err(|_| EkrError::ModeParse {
            path: self.mode_path.clone(),
            value: raw.clone(),
        })
    }

    fn run_commands(&self, mode: i64, dispatch: &dyn ConfigDispatch) {
        // Отрицательный режим - служебное значение драйвера
        if mode < 0 {
            return;
        }

        let Some(commands) = self.mode_commands.get(&mode) else {
            debug!("Для режима {} команды не заданы", mode);
            return;
        };

        for command in commands {
            if let Err(e) = dispatch.execute(command) {
                error!("Не удалось выполнить '{}': {}", command.join(" "), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::dispatch::RecordingDispatch;
    use crate::services::windowing::FakeWindowingQuery;
    use crate::utils::device_finder::tests::fake_remote;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> CommandArgs {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn remote_in(dir: &TempDir) -> Remote {
        let mode_path = dir.path().join("remote_mode");
        Remote::with_identity(mode_path, PathBuf::from("/dev/input/event5"), "12".to_string())
    }

    fn write_mode(remote: &Remote, value: &str) {
        fs::write(remote.mode_path(), value).unwrap();
    }

    #[test]
    fn test_new_resolves_identity() {
        let root = TempDir::new().unwrap();
        let mode_path = fake_remote(root.path(), "0003:056A:0331.0001", "111", Some("event5"));
        let query = FakeWindowingQuery::default()
            .with_device("12", "Wacom Express Key Remote Pad pad", "/dev/input/event5");

        let remote = Remote::new(&mode_path, &query).unwrap();

        assert_eq!(remote.mode_path(), mode_path.as_path());
        assert_eq!(remote.event_path(), Path::new("/dev/input/event5"));
        assert_eq!(remote.windowing_id(), "12");
        assert_eq!(remote.mode(), ModeState::Uninitialized);
    }

    #[test]
    fn test_new_without_x11_device_has_empty_id() {
        let root = TempDir::new().unwrap();
        let mode_path = fake_remote(root.path(), "0003:056A:0331.0001", "111", Some("event5"));

        let remote = Remote::new(&mode_path, &FakeWindowingQuery::default()).unwrap();
        assert_eq!(remote.windowing_id(), "");
    }

    #[test]
    fn test_new_without_event_node_fails() {
        let root = TempDir::new().unwrap();
        let mode_path = fake_remote(root.path(), "0003:056A:0331.0001", "111", None);

        assert!(Remote::new(&mode_path, &FakeWindowingQuery::default()).is_err());
    }

    #[test]
    fn test_first_poll_is_a_change() {
        let dir = TempDir::new().unwrap();
        let mut remote = remote_in(&dir);
        remote.set_mode_commands(1, vec![args(&["button", "3", "key", "a"])]);
        write_mode(&remote, "1\n");

        let dispatch = RecordingDispatch::default();
        let outcome = remote.poll(&dispatch).unwrap();

        assert_eq!(outcome, PollOutcome::Changed { from: ModeState::Uninitialized, to: 1 });
        assert_eq!(remote.mode(), ModeState::Known(1));
        assert_eq!(
            dispatch.take(),
            vec![args(&["xsetwacom", "set", "12", "button", "3", "key", "a"])]
        );
    }

    #[test]
    fn test_repeated_polls_do_not_rerun_commands() {
        let dir = TempDir::new().unwrap();
        let mut remote = remote_in(&dir);
        remote.set_mode_commands(0, vec![args(&["button", "1", "key", "a"])]);
        write_mode(&remote, "0");

        let dispatch = RecordingDispatch::default();
        remote.poll(&dispatch).unwrap();
        assert_eq!(dispatch.take().len(), 1);

        for _ in 0..3 {
            assert_eq!(remote.poll(&dispatch).unwrap(), PollOutcome::Unchanged(0));
        }
        assert!(dispatch.take().is_empty());
    }

    #[test]
    fn test_mode_switch_runs_new_mode_commands_in_order() {
        let dir = TempDir::new().unwrap();
        let mut remote = remote_in(&dir);
        remote.set_mode_commands(0, vec![args(&["button", "1", "key", "a"])]);
        remote.set_mode_commands(
            2,
            vec![args(&["AbsWheelUp", "key", "plus"]), args(&["AbsWheelDown", "key", "minus"])],
        );

        let dispatch = RecordingDispatch::default();
        write_mode(&remote, "0");
        remote.poll(&dispatch).unwrap();
        dispatch.take();

        write_mode(&remote, " 2 \n");
        let outcome = remote.poll(&dispatch).unwrap();

        assert_eq!(outcome, PollOutcome::Changed { from: ModeState::Known(0), to: 2 });
        assert_eq!(
            dispatch.take(),
            vec![
                args(&["xsetwacom", "set", "12", "AbsWheelUp", "key", "plus"]),
                args(&["xsetwacom", "set", "12", "AbsWheelDown", "key", "minus"]),
            ]
        );
    }

    #[test]
    fn test_mode_without_commands_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut remote = remote_in(&dir);
        write_mode(&remote, "1");

        let dispatch = RecordingDispatch::default();
        assert!(remote.poll(&dispatch).unwrap().is_changed());
        assert!(dispatch.take().is_empty());
    }

    #[test]
    fn test_negative_mode_never_dispatches() {
        let dir = TempDir::new().unwrap();
        let mut remote = remote_in(&dir);
        remote.set_mode_commands(-1, vec![args(&["button", "1", "key", "a"])]);
        write_mode(&remote, "-1");

        let dispatch = RecordingDispatch::default();
        assert!(remote.poll(&dispatch).unwrap().is_changed());
        assert_eq!(remote.mode(), ModeState::Known(-1));
        assert!(dispatch.take().is_empty());
    }

    #[test]
    fn test_read_failure_keeps_mode() {
        let dir = TempDir::new().unwrap();
        let mut remote = remote_in(&dir);
        let dispatch = RecordingDispatch::default();

        write_mode(&remote, "1");
        remote.poll(&dispatch).unwrap();

        write_mode(&remote, "not a number");
        assert!(matches!(remote.poll(&dispatch), Err(EkrError::ModeParse { .. })));
        assert_eq!(remote.mode(), ModeState::Known(1));

        fs::remove_file(remote.mode_path()).unwrap();
        assert!(matches!(remote.poll(&dispatch), Err(EkrError::ModeRead { .. })));
        assert_eq!(remote.mode(), ModeState::Known(1));
    }

    #[test]
    fn test_set_mode_commands_replaces_previous() {
        let dir = TempDir::new().unwrap();
        let mut remote = remote_in(&dir);
        remote.set_mode_commands(0, vec![args(&["button", "1", "key", "a"])]);
        remote.set_mode_commands(0, vec![args(&["button", "2", "key", "b"])]);

        assert_eq!(
            remote.mode_commands(0).unwrap(),
            &[args(&["xsetwacom", "set", "12", "button", "2", "key", "b"])]
        );
    }

    #[test]
    fn test_command_tables_are_per_remote() {
        let dir = TempDir::new().unwrap();
        let mut first = remote_in(&dir);
        let second = remote_in(&dir);
        first.set_mode_commands(0, vec![args(&["button", "1", "key", "a"])]);

        assert!(first.mode_commands(0).is_some());
        assert!(second.mode_commands(0).is_none());
    }
}
