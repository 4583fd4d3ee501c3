use crate::menu::{ItemId, Point, PointerPhase};
use std::str::FromStr;
use strum::EnumString;
use thiserror::Error;

/// One line of a pointer script.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Pointer(PointerPhase),
    /// Move onto the centre of an item of the open menu.
    Hover(ItemId),
    Reset,
    Items(Vec<ItemId>),
    Decline,
    Accept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum Keyword {
    #[strum(serialize = "down", serialize = "press")]
    Down,
    Move,
    Hover,
    #[strum(serialize = "up", serialize = "release")]
    Up,
    Cancel,
    Reset,
    Items,
    Decline,
    Accept,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptErrorKind {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("expected x and y coordinates")]
    MissingCoordinate,
    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),
    #[error("expected an item id")]
    MissingItem,
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct ScriptError {
    pub line: usize,
    pub kind: ScriptErrorKind,
}

pub fn parse(input: &str) -> Result<Vec<Command>, ScriptError> {
    input
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            parse_line(line)
                .map_err(|kind| ScriptError {
                    line: idx + 1,
                    kind,
                })
                .transpose()
        })
        .collect()
}

/// Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ScriptErrorKind> {
    let line = line.split('#').next().unwrap_or_default().trim();
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };

    let keyword =
        Keyword::from_str(word).map_err(|_| ScriptErrorKind::UnknownCommand(word.to_string()))?;

    let command = match keyword {
        Keyword::Down => Command::Pointer(PointerPhase::Began(point(&mut words)?)),
        Keyword::Move => Command::Pointer(PointerPhase::Moved(point(&mut words)?)),
        Keyword::Hover => Command::Hover(
            words
                .next()
                .map(ItemId::new)
                .ok_or(ScriptErrorKind::MissingItem)?,
        ),
        Keyword::Up => Command::Pointer(PointerPhase::Ended),
        Keyword::Cancel => Command::Pointer(PointerPhase::Cancelled),
        Keyword::Reset => Command::Reset,
        Keyword::Items => {
            let ids: Vec<ItemId> = words
                .by_ref()
                .flat_map(|word| word.split(','))
                .filter(|id| !id.is_empty())
                .map(ItemId::new)
                .collect();
            if ids.is_empty() {
                return Err(ScriptErrorKind::MissingItem);
            }
            Command::Items(ids)
        }
        Keyword::Decline => Command::Decline,
        Keyword::Accept => Command::Accept,
    };

    match words.next() {
        Some(extra) => Err(ScriptErrorKind::UnexpectedArgument(extra.to_string())),
        None => Ok(Some(command)),
    }
}

fn point<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Point, ScriptErrorKind> {
    let mut coordinate = || {
        let word = words.next().ok_or(ScriptErrorKind::MissingCoordinate)?;
        word.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ScriptErrorKind::InvalidCoordinate(word.to_string()))
    };
    let x = coordinate()?;
    let y = coordinate()?;
    Ok(Point::new(x, y))
}
