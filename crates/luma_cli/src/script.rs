//! Plain-text input event scripts.
//!
//! One command per line; blank lines and `#` comments are skipped:
//!
//! ```text
//! reshape 600 800
//! press secondary 450 400
//! motion 500 420
//! release
//! key h
//! save out.png
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use luma_edit::{InputEvent, MouseButton, ESCAPE_KEY};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Event(InputEvent),
    Load(PathBuf),
    Save(PathBuf),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptLine {
    pub number: usize,
    pub command: Command,
}

pub fn parse(source: &str) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let number = index + 1;
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let command = parse_command(line).with_context(|| format!("line {number}: {line:?}"))?;
        lines.push(ScriptLine { number, command });
    }
    Ok(lines)
}

fn parse_command(line: &str) -> Result<Command> {
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let args: Vec<&str> = rest.split_whitespace().collect();

    let event = match verb {
        "press" => {
            let [button, x, y] = expect_args::<3>(verb, &args)?;
            InputEvent::Press { button: parse_button(button)?, x: parse_num(x)?, y: parse_num(y)? }
        },
        "motion" => {
            let [x, y] = expect_args::<2>(verb, &args)?;
            InputEvent::Motion { x: parse_num(x)?, y: parse_num(y)? }
        },
        "release" => {
            expect_args::<0>(verb, &args)?;
            InputEvent::Release
        },
        "key" => {
            let [key] = expect_args::<1>(verb, &args)?;
            InputEvent::Key(parse_key(key)?)
        },
        "reshape" => {
            let [width, height] = expect_args::<2>(verb, &args)?;
            InputEvent::Reshape { width: parse_num(width)?, height: parse_num(height)? }
        },
        "load" | "save" => {
            let path = rest.trim();
            if path.is_empty() {
                bail!("{verb} needs a path");
            }
            let path = PathBuf::from(path);
            return Ok(if verb == "load" { Command::Load(path) } else { Command::Save(path) });
        },
        other => bail!("unknown command {other:?}"),
    };
    Ok(Command::Event(event))
}

fn expect_args<'a, const N: usize>(verb: &str, args: &[&'a str]) -> Result<[&'a str; N]> {
    <[&str; N]>::try_from(args)
        .map_err(|_| anyhow!("{verb} takes {N} argument(s), got {}", args.len()))
}

fn parse_button(name: &str) -> Result<MouseButton> {
    match name {
        "primary" | "left" => Ok(MouseButton::Primary),
        "secondary" | "right" => Ok(MouseButton::Secondary),
        "middle" | "other" => Ok(MouseButton::Other),
        other => bail!("unknown mouse button {other:?}"),
    }
}

fn parse_key(key: &str) -> Result<char> {
    if key.eq_ignore_ascii_case("escape") || key.eq_ignore_ascii_case("esc") {
        return Ok(ESCAPE_KEY);
    }
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => bail!("key must be a single character or `escape`, got {key:?}"),
    }
}

fn parse_num<T: std::str::FromStr>(value: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse().with_context(|| format!("invalid number {value:?}"))
}
