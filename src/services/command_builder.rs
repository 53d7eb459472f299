//! Перевод опций секции `mode_N` в аргументы для `xsetwacom set <id>`.

use crate::config::ModeSection;
use thiserror::Error;

/// Кнопки с номером больше этого сдвигаются на `BUTTON_GAP`
const LAST_DIRECT_BUTTON: i64 = 3;

/// Пропуск в нумерации кнопок xsetwacom, недоступный на пульте
const BUTTON_GAP: i64 = 4;

/// Одна команда: список аргументов без `xsetwacom set <id>`
pub type CommandArgs = Vec<String>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandBuildError {
    #[error("некорректный номер кнопки '{0}'")]
    InvalidButton(String),

    #[error("неизвестный суффикс ring '{0}' (ожидается cw или ccw)")]
    UnknownRingSuffix(String),

    #[error("незакрытые кавычки в команде '{0}'")]
    UnbalancedQuotes(String),

    #[error("ожидался текст команд, получено значение другого типа")]
    NotText,
}

/// Опция, пропущенная при построении команд секции
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedOption {
    pub option: String,
    pub reason: CommandBuildError,
}

/// Команды одной секции и опции, которые пришлось пропустить
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionCommands {
    pub commands: Vec<CommandArgs>,
    pub skipped: Vec<SkippedOption>,
}

/// Разбить многострочный текст на команды (с учётом кавычек, как shell)
pub fn split_commands(text: &str) -> Result<Vec<CommandArgs>, CommandBuildError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| shlex::split(line).ok_or_else(|| CommandBuildError::UnbalancedQuotes(line.to_string())))
        .collect()
}

/// Номер кнопки в нумерации xsetwacom
pub fn adjust_button_index(button: i64) -> i64 {
    if button > LAST_DIRECT_BUTTON {
        button + BUTTON_GAP
    } else {
        button
    }
}

/// Аргументы, добавляемые перед каждой командой опции
fn prepend_args(option: &str) -> Result<CommandArgs, CommandBuildError> {
    let (prefix, suffix) = option.split_once('_').unwrap_or((option, ""));

    match prefix {
        "button" => {
            let button: i64 = suffix
                .parse()
                .map_err(|_| CommandBuildError::InvalidButton(suffix.to_string()))?;
            Ok(vec!["button".to_string(), adjust_button_index(button).to_string()])
        }
        "ring" => match suffix {
            "cw" => Ok(vec!["AbsWheelDown".to_string()]),
            "ccw" => Ok(vec!["AbsWheelUp".to_string()]),
            other => Err(CommandBuildError::UnknownRingSuffix(other.to_string())),
        },
        _ => Ok(Vec::new()),
    }
}

/// Построить команды для одной опции вида `button_5 = "key x"`
pub fn build_option_commands(option: &str, text: &str) -> Result<Vec<CommandArgs>, CommandBuildError> {
    let prepend = prepend_args(option)?;

    Ok(split_commands(text)?
        .into_iter()
        .map(|args| prepend.iter().cloned().chain(args).collect())
        .collect())
}

/// Построить команды всей секции в порядке обхода опций
pub fn build_section_commands(section: &ModeSection) -> SectionCommands {
    let mut result = SectionCommands::default();

    for (option, value) in section {
        // Имена опций в INI-стиле регистронезависимы
        let option = option.to_lowercase();
        let built = value
            .as_str()
            .ok_or(CommandBuildError::NotText)
            .and_then(|text| build_option_commands(&option, text));

        match built {
            Ok(commands) => result.commands.extend(commands),
            Err(reason) => result.skipped.push(SkippedOption { option, reason }),
        }
    }

    result
}
