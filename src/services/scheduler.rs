use crate::config::{section_name, Config, MODE_COUNT};
use crate::services::command_builder::build_section_commands;
use crate::services::dispatch::ConfigDispatch;
use crate::services::remote::Remote;
use crate::services::windowing::WindowingQuery;
use crate::utils::DeviceFinder;
use std::future::Future;
use tracing::{debug, error, info, warn};

/// Итоги одного цикла обнаружения и опроса
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub added: usize,
    pub changed: usize,
    pub retired: usize,
}

/// Главный цикл: владеет живым набором пультов
pub struct Scheduler {
    config: Config,
    finder: DeviceFinder,
    windowing: Box<dyn WindowingQuery>,
    dispatch: Box<dyn ConfigDispatch>,
    remotes: Vec<Remote>,
}

impl Scheduler {
    pub fn new(
        config: Config,
        finder: DeviceFinder,
        windowing: Box<dyn WindowingQuery>,
        dispatch: Box<dyn ConfigDispatch>,
    ) -> Self {
        Self {
            config,
            finder,
            windowing,
            dispatch,
            remotes: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn remotes(&self) -> &[Remote] {
        &self.remotes
    }

    /// Крутить циклы до сигнала `shutdown`
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let interval = self.config.sleep_interval();
        info!("Мониторинг пультов запущен, интервал опроса {:?}", interval);

        tokio::pin!(shutdown);
        loop {
            let report = self.run_cycle();
            if report.added > 0 || report.retired > 0 {
                debug!(
                    "Цикл: добавлено {}, сменили режим {}, удалено {}, всего {}",
                    report.added,
                    report.changed,
                    report.retired,
                    self.remotes.len()
                );
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Мониторинг остановлен, отслеживалось пультов: {}", self.remotes.len());
                    return;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }

    /// Один цикл: сначала добавить новые пульты, затем опросить все по порядку
    pub fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        let paths = match self.finder.find_mode_devices() {
            Ok(paths) => paths,
            Err(e) => {
                error!("Не удалось выполнить поиск пультов: {}", e);
                Vec::new()
            }
        };

        for path in paths {
            if self.remotes.iter().any(|remote| remote.mode_path() == path) {
                continue;
            }

            match Remote::new(&path, self.windowing.as_ref()) {
                Ok(mut remote) => {
                    self.configure(&mut remote);
                    self.remotes.push(remote);
                    report.added += 1;
                }
                Err(e) => error!("Не удалось создать пульт для {:?}: {}", path, e),
            }
        }

        let dispatch = self.dispatch.as_ref();
        self.remotes.retain_mut(|remote| match remote.poll(dispatch) {
            Ok(outcome) => {
                if outcome.is_changed() {
                    report.changed += 1;
                }
                true
            }
            Err(_) => {
                warn!("Не удалось обновить режим для {:?}, пульт удалён", remote.mode_path());
                report.retired += 1;
                false
            }
        });

        report
    }

    /// Заполнить таблицу команд пульта из секций mode_0..mode_2
    fn configure(&self, remote: &mut Remote) {
        for mode in 0..MODE_COUNT {
            let section = section_name(mode);

            let Some(options) = self.config.mode_section(mode) else {
                warn!("Секция '{}' не найдена в конфигурации", section);
                continue;
            };

            let built = build_section_commands(options);
            for skipped in &built.skipped {
                warn!(
                    "Опция '{}' в секции '{}' пропущена: {}",
                    skipped.option, section, skipped.reason
                );
            }

            remote.set_mode_commands(i64::from(mode), built.commands);
        }
    }
}
