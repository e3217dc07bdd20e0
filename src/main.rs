use std::error::Error;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use scopetrainer::sampler::Trace;
use scopetrainer::types::GRID_HEIGHT_DIVISIONS;
use scopetrainer::{Answer, AnswerSheet, Difficulty, Metric, ScopeError, Session, SessionConfig};

/// The size of the text screen.
const SCREEN_COLUMNS: usize = 61;
const SCREEN_ROWS: usize = 17;

const HELP: &str = "\
Commands:
    new [easy|medium|hard]     start a new exercise
    answer <metric> <value> [unit]
                               answer a metric (um, upp, ucc, t, f), e.g. `answer t 8 ms`
    check                      check the answers given so far
    solution                   show the expected answers
    show                       draw the screen
    ac                         toggle AC/DC coupling
    volts <+|-|step>           finer, coarser or a given vertical step (0 is 5 V/div)
    time <+|-|step>            finer, coarser or a given horizontal step (0 is 500 ms/div)
    pan <divisions>            move the trace sideways
    scroll <notches>           move the trace up or down
    origin <divisions>         put time zero this far from the left edge
    level <divisions>          put zero volts this far from the top edge
    centre [x|y]               recentre the trace, or one axis of it
    quit";

/// One line of input from the learner.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    New(Option<Difficulty>),
    Answer(Metric, Answer),
    Check,
    Solution,
    Show,
    ToggleCoupling,
    Volts(isize),
    Time(isize),
    VoltsStep(usize),
    TimeStep(usize),
    Pan(f64),
    Scroll(i32),
    Origin(f64),
    Level(f64),
    Centre,
    CentreHorizontal,
    CentreVertical,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = ScopeError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let invalid = || ScopeError::InvalidCommand(line.trim().to_string());

        let command = match words.as_slice() {
            ["new"] => Command::New(None),
            ["new", difficulty] => Command::New(Some(difficulty.parse()?)),
            ["answer", metric, value] => Command::Answer(metric.parse()?, Answer::new(*value, "")),
            ["answer", metric, value, unit] => Command::Answer(metric.parse()?, Answer::new(*value, *unit)),
            ["check"] => Command::Check,
            ["solution"] => Command::Solution,
            ["show"] => Command::Show,
            ["ac"] => Command::ToggleCoupling,
            ["volts", direction] => match parse_direction(direction) {
                Some(delta) => Command::Volts(delta),
                None => Command::VoltsStep(direction.parse().map_err(|_| invalid())?),
            },
            ["time", direction] => match parse_direction(direction) {
                Some(delta) => Command::Time(delta),
                None => Command::TimeStep(direction.parse().map_err(|_| invalid())?),
            },
            ["pan", delta] => Command::Pan(delta.parse().map_err(|_| invalid())?),
            ["scroll", notches] => Command::Scroll(notches.parse().map_err(|_| invalid())?),
            ["origin", pan] => Command::Origin(pan.parse().map_err(|_| invalid())?),
            ["level", pan] => Command::Level(pan.parse().map_err(|_| invalid())?),
            ["centre"] | ["center"] => Command::Centre,
            ["centre" | "center", "x"] => Command::CentreHorizontal,
            ["centre" | "center", "y"] => Command::CentreVertical,
            ["help"] | ["?"] => Command::Help,
            ["quit"] | ["exit"] => Command::Quit,
            _ => return Err(invalid()),
        };

        Ok(command)
    }
}

/// `+` selects a finer step, `-` a coarser one.
fn parse_direction(word: &str) -> Option<isize> {
    match word {
        "+" => Some(1),
        "-" => Some(-1),
        _ => None,
    }
}

/// Draw a trace as text, one character per grid cell, with the DC level as a dashed line.
fn draw(trace: &Trace) -> String {
    let mut screen = vec![vec![' '; SCREEN_COLUMNS]; SCREEN_ROWS];
    let to_row = |divisions: f64| {
        let row = (divisions / GRID_HEIGHT_DIVISIONS * (SCREEN_ROWS - 1) as f64).round();
        (0.0..SCREEN_ROWS as f64).contains(&row).then_some(row as usize)
    };

    // Graticule: a dot on every division.
    for row in (0..SCREEN_ROWS).step_by(2) {
        for column in (0..SCREEN_COLUMNS).step_by(6) {
            screen[row][column] = '·';
        }
    }

    if let Some(row) = trace.dc_marker().and_then(|level| to_row(trace.vertical_position(level))) {
        screen[row].iter_mut().for_each(|cell| *cell = '-');
    }

    for point in &trace.points {
        if let Some(row) = to_row(trace.vertical_position(point.value)) {
            if let Some(cell) = screen[row].get_mut(point.index) {
                *cell = '*';
            }
        }
    }

    screen
        .into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_exercise(session: &Session) -> String {
    let mut text = String::new();
    if let Some(exercise) = session.exercise() {
        text.push_str(&format!("New {} exercise, measure:\n", exercise.difficulty()));
        for metric in exercise.asked_metrics() {
            let units: Vec<&str> = metric.category().units().iter().map(|unit| unit.label).collect();
            text.push_str(&format!("    {:<22} [{}]\n", metric.label(), units.join(", ")));
        }
    }
    text
}

fn status(session: &Session) -> String {
    format!(
        "{} | {} | {}",
        session.scale().vertical_label(),
        session.scale().horizontal_label(),
        session.coupling()
    )
}

/// Start the text-mode training session.
fn main() -> Result<(), Box<dyn Error>> {
    // Initialise logging.
    env_logger::init();

    // Load configuration from the first argument, if given.
    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };

    let mut session = Session::new(&config);
    let mut answers = AnswerSheet::new();

    session.new_exercise(config.difficulty);
    println!("{HELP}\n");
    println!("{}", draw(&session.render(SCREEN_COLUMNS)));
    println!("{}", status(&session));
    print!("{}", describe_exercise(&session));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match command {
            Command::New(difficulty) => {
                answers.clear();
                session.new_exercise(difficulty.unwrap_or(session.difficulty()));
                println!("{}", draw(&session.render(SCREEN_COLUMNS)));
                println!("{}", status(&session));
                print!("{}", describe_exercise(&session));
            },
            Command::Answer(metric, answer) => {
                answers.insert(metric, answer);
            },
            Command::Check => {
                if let Some(validation) = session.validate(&answers) {
                    let verdict = if validation.passed { "Correct!" } else { "Not quite." };
                    println!("{verdict} {}", validation.feedback());
                }
            },
            Command::Solution => {
                if let Some(solution) = session.solution() {
                    println!("{solution}");
                }
            },
            Command::Show => {
                println!("{}", draw(&session.render(SCREEN_COLUMNS)));
                println!("{}", status(&session));
            },
            Command::ToggleCoupling => {
                println!("{}", session.toggle_coupling());
            },
            Command::Volts(delta) => {
                session.step_vertical(delta);
                println!("{}", status(&session));
            },
            Command::Time(delta) => {
                session.step_horizontal(delta);
                println!("{}", status(&session));
            },
            Command::VoltsStep(step) => {
                session.set_vertical_step(step);
                println!("{}", status(&session));
            },
            Command::TimeStep(step) => {
                session.set_horizontal_step(step);
                println!("{}", status(&session));
            },
            Command::Pan(delta) => session.pan_horizontal(delta),
            Command::Scroll(notches) => session.scroll_vertical(notches),
            Command::Origin(pan) => session.set_horizontal_pan(pan),
            Command::Level(pan) => session.set_vertical_pan(pan),
            Command::Centre => session.recentre(),
            Command::CentreHorizontal => session.reset_horizontal_pan(),
            Command::CentreVertical => session.reset_vertical_pan(),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    log::info!("Exit requested");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopetrainer::sampler;
    use scopetrainer::scale::DisplayScale;
    use scopetrainer::signal::{Coupling, SignalModel};

    #[test]
    fn test_parse_commands() {
        assert_eq!("new".parse::<Command>().ok(), Some(Command::New(None)));
        assert_eq!("new hard".parse::<Command>().ok(), Some(Command::New(Some(Difficulty::Hard))));
        assert_eq!(
            "answer t 8 ms".parse::<Command>().ok(),
            Some(Command::Answer(Metric::Period, Answer::new("8", "ms")))
        );
        assert_eq!("volts -".parse::<Command>().ok(), Some(Command::Volts(-1)));
        assert_eq!("  pan 1.5 ".parse::<Command>().ok(), Some(Command::Pan(1.5)));
        assert_eq!("scroll -2".parse::<Command>().ok(), Some(Command::Scroll(-2)));
        assert_eq!("volts 3".parse::<Command>().ok(), Some(Command::VoltsStep(3)));
        assert_eq!("time 0".parse::<Command>().ok(), Some(Command::TimeStep(0)));
        assert_eq!("origin 2".parse::<Command>().ok(), Some(Command::Origin(2.0)));
        assert_eq!("level 6.5".parse::<Command>().ok(), Some(Command::Level(6.5)));
        assert_eq!("centre x".parse::<Command>().ok(), Some(Command::CentreHorizontal));
        assert_eq!("center y".parse::<Command>().ok(), Some(Command::CentreVertical));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("new extreme".parse::<Command>(), Err(ScopeError::UnknownDifficulty(_))));
        assert!(matches!("answer x 1".parse::<Command>(), Err(ScopeError::UnknownMetric(_))));
        assert!(matches!("time faster".parse::<Command>(), Err(ScopeError::InvalidCommand(_))));
        assert!(matches!("volts -2".parse::<Command>(), Err(ScopeError::InvalidCommand(_))));
        assert!(matches!("centre z".parse::<Command>(), Err(ScopeError::InvalidCommand(_))));
        assert!(matches!("dance".parse::<Command>(), Err(ScopeError::InvalidCommand(_))));
    }

    #[test]
    fn test_draw_dimensions() {
        let signal = SignalModel::default();
        let trace = sampler::sample(&signal, &DisplayScale::default(), Coupling::DC, SCREEN_COLUMNS);
        let screen = draw(&trace);

        assert_eq!(screen.lines().count(), SCREEN_ROWS);
        assert!(screen.lines().all(|line| line.chars().count() == SCREEN_COLUMNS));
        assert!(screen.contains('*'));
    }
}
