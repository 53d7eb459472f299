use crate::error::Result;
use crate::utils::DeviceFinder;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

/// Частота опроса fix-permissions по умолчанию (Гц)
pub const HZ_DEFAULT: u32 = 5;

const WORLD_READ: u32 = 0o004;
const GROUP_WORLD_READ: u32 = 0o044;

/// Добавить права g+r,o+r файлу режима, если он не читается всеми.
///
/// Возвращает `true`, если права были изменены.
pub fn fix_mode_permissions(path: &Path) -> Result<bool> {
    let metadata = fs::metadata(path)?;
    let mode = metadata.permissions().mode();

    if mode & WORLD_READ != 0 {
        return Ok(false);
    }

    fs::set_permissions(path, fs::Permissions::from_mode(mode | GROUP_WORLD_READ))?;
    Ok(true)
}

/// Один проход: исправить права всех найденных файлов remote_mode
pub fn fixup_remotes(finder: &DeviceFinder) -> usize {
    let paths = match finder.find_mode_devices() {
        Ok(paths) => paths,
        Err(e) => {
            error!("Не удалось выполнить поиск пультов: {}", e);
            return 0;
        }
    };

    let mut fixed = 0;
    for path in paths {
        match fix_mode_permissions(&path) {
            Ok(true) => {
                info!("Права обновлены для {:?}", path);
                fixed += 1;
            }
            Ok(false) => {}
            Err(e) => error!("Не удалось обновить права для {:?}: {}", path, e),
        }
    }
    fixed
}

/// Цикл исправления прав; завершается по сигналу `shutdown`
pub async fn run_permission_fixer<F>(finder: DeviceFinder, hz: u32, shutdown: F)
where
    F: std::future::Future<Output = ()>,
{
    let interval = Duration::from_nanos(1_000_000_000 / u64::from(hz.max(1)));
    info!("Запуск исправления прав remote_mode с частотой {} Гц", hz);

    tokio::pin!(shutdown);
    loop {
        fixup_remotes(&finder);

        tokio::select! {
            _ = &mut shutdown => {
                info!("Исправление прав остановлено");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// Проверить, что запущены от root (иначе chmod скорее всего не сработает)
pub fn check_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            info!("Исправление прав запущено от имени root");
        }
        Ok(user) => {
            warn!("⚠️  Программа запущена не от root (пользователь: {})!", user);
            warn!("   Права на remote_mode, скорее всего, обновить не удастся");
        }
        Err(_) => {
            warn!("Не удалось определить пользователя");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::device_finder::tests::fake_remote;
    use tempfile::TempDir;

    fn mode_of(path: &Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn test_fix_adds_group_and_world_read() {
        let root = TempDir::new().unwrap();
        let path = fake_remote(root.path(), "0003:056A:0331.0001", "111", Some("event5"));
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        assert!(fix_mode_permissions(&path).unwrap());
        assert_eq!(mode_of(&path), 0o644);
    }

    #[test]
    fn test_fix_leaves_readable_file_alone() {
        let root = TempDir::new().unwrap();
        let path = fake_remote(root.path(), "0003:056A:0331.0001", "111", Some("event5"));
        fs::set_permissions(&path, fs::Permissions::from_mode(0o604)).unwrap();

        assert!(!fix_mode_permissions(&path).unwrap());
        assert_eq!(mode_of(&path), 0o604);
    }

    #[test]
    fn test_fixup_remotes_counts_changes() {
        let root = TempDir::new().unwrap();
        let first = fake_remote(root.path(), "0003:056A:0331.0001", "111", Some("event5"));
        let second = fake_remote(root.path(), "0003:056A:0331.0002", "222", Some("event6"));
        fs::set_permissions(&first, fs::Permissions::from_mode(0o600)).unwrap();
        fs::set_permissions(&second, fs::Permissions::from_mode(0o644)).unwrap();

        let finder = DeviceFinder::new(root.path());
        assert_eq!(fixup_remotes(&finder), 1);
        assert_eq!(fixup_remotes(&finder), 0);
    }

    #[test]
    fn test_fix_missing_file_is_error() {
        assert!(fix_mode_permissions(Path::new("/non/existent/remote_mode")).is_err());
    }
}
