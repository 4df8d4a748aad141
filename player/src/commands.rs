use std::str::FromStr;

use crate::{CommandError, Difficulty};

/// A line typed in interactive mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Generate,
    /// Generates first when there is nothing to process.
    Process,
    Play,
    Pause,
    Next,
    Previous,
    /// Number of moves to show applied, `0` for the initial grid.
    Seek(usize),
    /// One-based, as shown in the status line.
    Select(usize),
    Speed(u8),
    Difficulty(Difficulty),
    Count(u32),
    Show,
    Help,
    Quit,
}

impl Control {
    pub const HELP: &'static str = "\
commands:
  generate          request new problems
  process           run the solver (generates first if needed)
  play | pause      start or stop playback
  next | prev       step one move
  seek N            show the grid after N moves (0 = initial)
  select N          switch to problem N
  speed N           playback speed, 1-100
  difficulty NAME   beginner, intermediate or expert
  count N           problems per generation
  show              print the current frame
  quit";
}

impl FromStr for Control {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err(CommandError::Unknown(String::new()));
        };
        let argument = words.next();

        Ok(match command.to_ascii_lowercase().as_str() {
            "generate" | "g" => Self::Generate,
            "process" | "run" => Self::Process,
            "play" => Self::Play,
            "pause" | "stop" => Self::Pause,
            "next" | "n" => Self::Next,
            "prev" | "previous" | "p" => Self::Previous,
            "seek" => match argument {
                Some("start") => Self::Seek(0),
                _ => Self::Seek(parse_argument("seek", argument)?),
            },
            "select" => match parse_argument("select", argument)? {
                0 => {
                    return Err(CommandError::InvalidArgument {
                        command: "select",
                        value: "0".to_owned(),
                    });
                }
                problem => Self::Select(problem),
            },
            "speed" => Self::Speed(parse_argument("speed", argument)?),
            "difficulty" => {
                let value = argument.ok_or(CommandError::MissingArgument("difficulty"))?;
                let difficulty = <Difficulty as clap::ValueEnum>::from_str(value, true).map_err(|_| {
                    CommandError::InvalidArgument {
                        command: "difficulty",
                        value: value.to_owned(),
                    }
                })?;
                Self::Difficulty(difficulty)
            }
            "count" => Self::Count(parse_argument("count", argument)?),
            "show" | "s" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(CommandError::Unknown(command.to_owned())),
        })
    }
}

fn parse_argument<T: FromStr>(command: &'static str, argument: Option<&str>) -> Result<T, CommandError> {
    let value = argument.ok_or(CommandError::MissingArgument(command))?;
    value.parse().map_err(|_| CommandError::InvalidArgument {
        command,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_commands() {
        assert_eq!("generate".parse(), Ok(Control::Generate));
        assert_eq!("  PLAY ".parse(), Ok(Control::Play));
        assert_eq!("prev".parse(), Ok(Control::Previous));
        assert_eq!("q".parse(), Ok(Control::Quit));
    }

    #[test]
    fn parses_arguments() {
        assert_eq!("seek 4".parse(), Ok(Control::Seek(4)));
        assert_eq!("seek start".parse(), Ok(Control::Seek(0)));
        assert_eq!("select 2".parse(), Ok(Control::Select(2)));
        assert_eq!("speed 100".parse(), Ok(Control::Speed(100)));
        assert_eq!("count 25".parse(), Ok(Control::Count(25)));
        assert_eq!(
            "difficulty expert".parse(),
            Ok(Control::Difficulty(Difficulty::Expert))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            "seek".parse::<Control>(),
            Err(CommandError::MissingArgument("seek"))
        );
        assert_eq!(
            "speed fast".parse::<Control>(),
            Err(CommandError::InvalidArgument {
                command: "speed",
                value: "fast".to_owned()
            })
        );
        assert!(matches!(
            "select 0".parse::<Control>(),
            Err(CommandError::InvalidArgument { .. })
        ));
        assert!(matches!(
            "difficulty nightmare".parse::<Control>(),
            Err(CommandError::InvalidArgument { .. })
        ));
        assert_eq!(
            "dance".parse::<Control>(),
            Err(CommandError::Unknown("dance".to_owned()))
        );
    }
}
