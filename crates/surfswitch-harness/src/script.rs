#![forbid(unsafe_code)]

//! Session scripts.
//!
//! A script is a list of steps separated by newlines or `;`. `#` starts a
//! comment. Keywords are case-insensitive.
//!
//! ```text
//! create output          # 640x480 unless a size is given
//! create a 320x160
//! create b
//! tick 10                # ten refresh signals
//! press                  # A -> B
//! destroy b
//! tick
//! expect BLUE
//! press 2
//! fail-lock a
//! change a 640x320
//! stop
//! start
//! ```

use std::fmt;
use std::str::FromStr;

use surfswitch_core::geometry::Size;
use surfswitch_core::surface::{InputSlot, SurfaceRole};
use thiserror::Error;

pub const DEFAULT_OUTPUT_SIZE: Size = Size::new(640, 480);
pub const DEFAULT_INPUT_SIZE: Size = Size::new(320, 160);

/// Script run when none is given: a full press cycle, an input lost while
/// selected, and a tick with only A valid.
pub const DEFAULT_SCRIPT: &str = "\
create output
create a
create b
expect RED
tick 3
press
expect BLUE
tick 3
destroy b
tick 3
press
expect NULL
press
expect RED
tick 3
";

/// One scripted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Create(SurfaceRole, Size),
    Change(SurfaceRole, Size),
    Destroy(SurfaceRole),
    /// Operator presses.
    Press(u32),
    /// Refresh signals.
    Tick(u32),
    FailLock(InputSlot),
    FailPost(InputSlot),
    /// Hosting view stops.
    Stop,
    /// Hosting view (re)starts.
    Start,
    /// Check the operator label.
    Expect(&'static str),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create(role, size) => write!(f, "create {role} {}x{}", size.width, size.height),
            Self::Change(role, size) => write!(f, "change {role} {}x{}", size.width, size.height),
            Self::Destroy(role) => write!(f, "destroy {role}"),
            Self::Press(n) => write!(f, "press {n}"),
            Self::Tick(n) => write!(f, "tick {n}"),
            Self::FailLock(slot) => write!(f, "fail-lock {slot}"),
            Self::FailPost(slot) => write!(f, "fail-post {slot}"),
            Self::Stop => f.write_str("stop"),
            Self::Start => f.write_str("start"),
            Self::Expect(label) => write!(f, "expect {label}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("step {step}: {message}")]
pub struct ScriptError {
    /// 1-based index of the offending step.
    pub step: usize,
    pub message: String,
}

impl ScriptError {
    fn new(step: usize, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
        }
    }
}

/// Parsed script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        let items = source
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default())
            .flat_map(|line| line.split(';'))
            .map(str::trim)
            .filter(|item| !item.is_empty());
        for (i, item) in items.enumerate() {
            steps.push(parse_step(i + 1, item)?);
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromStr for Script {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_step(step: usize, item: &str) -> Result<Step, ScriptError> {
    let mut words = item.split_whitespace();
    let keyword = words.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = words.collect();
    let err = |message: String| ScriptError::new(step, message);

    let arity = |min: usize, max: usize| -> Result<(), ScriptError> {
        if args.len() < min || args.len() > max {
            return Err(err(format!(
                "`{keyword}` takes {} argument(s), got {}",
                if min == max { min.to_string() } else { format!("{min}-{max}") },
                args.len()
            )));
        }
        Ok(())
    };

    match keyword.as_str() {
        "create" => {
            arity(1, 2)?;
            let role = parse_role(args[0]).map_err(err)?;
            let size = match args.get(1) {
                Some(raw) => parse_size(raw).map_err(err)?,
                None if role == SurfaceRole::Output => DEFAULT_OUTPUT_SIZE,
                None => DEFAULT_INPUT_SIZE,
            };
            Ok(Step::Create(role, size))
        }
        "change" => {
            arity(2, 2)?;
            let role = parse_role(args[0]).map_err(err)?;
            Ok(Step::Change(role, parse_size(args[1]).map_err(err)?))
        }
        "destroy" => {
            arity(1, 1)?;
            Ok(Step::Destroy(parse_role(args[0]).map_err(err)?))
        }
        "press" => {
            arity(0, 1)?;
            Ok(Step::Press(parse_count(args.first().copied()).map_err(err)?))
        }
        "tick" => {
            arity(0, 1)?;
            Ok(Step::Tick(parse_count(args.first().copied()).map_err(err)?))
        }
        "fail-lock" | "fail-post" => {
            arity(1, 1)?;
            let slot = parse_slot(args[0]).map_err(err)?;
            Ok(if keyword == "fail-lock" {
                Step::FailLock(slot)
            } else {
                Step::FailPost(slot)
            })
        }
        "stop" => {
            arity(0, 0)?;
            Ok(Step::Stop)
        }
        "start" => {
            arity(0, 0)?;
            Ok(Step::Start)
        }
        "expect" => {
            arity(1, 1)?;
            let label = match args[0].to_ascii_uppercase().as_str() {
                "RED" => "RED",
                "BLUE" => "BLUE",
                "NULL" => "NULL",
                other => return Err(err(format!("unknown label `{other}`"))),
            };
            Ok(Step::Expect(label))
        }
        "" => Err(err("empty step".into())),
        other => Err(err(format!("unknown step `{other}`"))),
    }
}

fn parse_role(raw: &str) -> Result<SurfaceRole, String> {
    match raw.to_ascii_lowercase().as_str() {
        "output" | "out" => Ok(SurfaceRole::Output),
        "a" | "input-a" => Ok(SurfaceRole::Input(InputSlot::A)),
        "b" | "input-b" => Ok(SurfaceRole::Input(InputSlot::B)),
        _ => Err(format!("unknown surface `{raw}` (expected output, a or b)")),
    }
}

fn parse_slot(raw: &str) -> Result<InputSlot, String> {
    match parse_role(raw)? {
        SurfaceRole::Input(slot) => Ok(slot),
        SurfaceRole::Output => Err("the overlay only draws on inputs a and b".into()),
    }
}

fn parse_size(raw: &str) -> Result<Size, String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("size `{raw}` must look like WIDTHxHEIGHT"))?;
    let width = w
        .parse::<u32>()
        .map_err(|e| format!("bad width `{w}`: {e}"))?;
    let height = h
        .parse::<u32>()
        .map_err(|e| format!("bad height `{h}`: {e}"))?;
    let size = Size::new(width, height);
    if size.is_empty() {
        return Err(format!("size `{raw}` is empty"));
    }
    if !size.within_max_edge() {
        return Err(format!(
            "size `{raw}` exceeds the {max}x{max} limit",
            max = Size::MAX_EDGE
        ));
    }
    Ok(size)
}

fn parse_count(raw: Option<&str>) -> Result<u32, String> {
    match raw {
        None => Ok(1),
        Some(raw) => match raw.parse::<u32>() {
            Ok(0) => Err("count must be at least 1".into()),
            Ok(n) => Ok(n),
            Err(e) => Err(format!("bad count `{raw}`: {e}")),
        },
    }
}
