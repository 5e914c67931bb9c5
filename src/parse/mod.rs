use std::path::PathBuf;

use itertools::Itertools;
use logos::Logos;
use thiserror::Error;

use crate::{
    cmd::execution_plan::{Command, ExecutionPlan},
    config::Limits,
};

use self::token::{LexerError, Operator, Token};

pub mod token;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("failed to tokenize command")]
    Lexer(Vec<LexerError>),
    #[error("syntax error: missing command near `{0}`")]
    MissingCommand(Operator),
    #[error("syntax error: unexpected `{0}` after output file")]
    UnexpectedToken(String),
    #[error("too many commands in one line ({count}, limit is {limit})")]
    TooManyCommands { count: usize, limit: usize },
    #[error("too many arguments for {program} ({count}, limit is {limit})")]
    TooManyArguments {
        program: String,
        count: usize,
        limit: usize,
    },
}

pub fn tokenize(cmd: &str) -> Result<Vec<Token<'_>>, CommandParseError> {
    let tokens = Token::lexer(cmd).collect::<Vec<_>>();

    // unreachable with the current token set, see `LexerError`
    if tokens.iter().any(|r| r.is_err()) {
        return Err(CommandParseError::Lexer(
            tokens.into_iter().filter_map(|r| r.err()).collect(),
        ));
    }

    Ok(tokens.into_iter().flatten().collect())
}

pub fn parse_command(cmd: &str) -> Result<ExecutionPlan, CommandParseError> {
    parse_command_with(cmd, &Limits::default())
}

pub fn parse_command_with(cmd: &str, limits: &Limits) -> Result<ExecutionPlan, CommandParseError> {
    let tokens = tokenize(cmd)?;
    let plan = plan_from_tokens(&tokens)?;

    check_limits(&plan, limits)?;

    Ok(plan)
}

/// Classifies a token sequence. The first operator seen fixes the mode for
/// the whole line; operators of any other kind become literal arguments.
pub fn plan_from_tokens(tokens: &[Token<'_>]) -> Result<ExecutionPlan, CommandParseError> {
    let Some((position, operator)) = tokens
        .iter()
        .find_position(|token| token.operator().is_some())
        .and_then(|(position, token)| token.operator().map(|op| (position, op)))
    else {
        return Ok(command_from(tokens).map_or(ExecutionPlan::NoOp, ExecutionPlan::Simple));
    };

    trace!(%operator, position, "selected execution mode");

    match operator {
        Operator::Concurrent => split_commands(tokens, operator).map(ExecutionPlan::Concurrent),
        Operator::Sequential => split_commands(tokens, operator).map(ExecutionPlan::Sequential),
        Operator::Redirect => {
            let command = command_from(&tokens[..position])
                .ok_or(CommandParseError::MissingCommand(operator))?;

            Ok(match target(&tokens[position + 1..])? {
                Some(path) => ExecutionPlan::Redirected(command, path),
                None => {
                    debug!("redirect without a target, ignoring line");
                    ExecutionPlan::NoOp
                }
            })
        }
        Operator::Pipe => {
            let (stages, sink) = match tokens.iter().position(|t| *t == Token::Redirect) {
                Some(gt) => match target(&tokens[gt + 1..])? {
                    Some(path) => (&tokens[..gt], Some(path)),
                    None => {
                        debug!("pipeline sink without a target, ignoring line");
                        return Ok(ExecutionPlan::NoOp);
                    }
                },
                None => (tokens, None),
            };

            Ok(ExecutionPlan::Piped(split_commands(stages, operator)?, sink))
        }
    }
}

fn command_from(segment: &[Token<'_>]) -> Option<Command> {
    Command::new(segment.iter().map(|token| token.text()))
}

fn split_commands(
    tokens: &[Token<'_>],
    separator: Operator,
) -> Result<Vec<Command>, CommandParseError> {
    tokens
        .split(|token| token.operator() == Some(separator))
        .map(|segment| command_from(segment).ok_or(CommandParseError::MissingCommand(separator)))
        .collect()
}

/// The tokens following a `>`: nothing, or exactly one filename.
fn target(rest: &[Token<'_>]) -> Result<Option<PathBuf>, CommandParseError> {
    match rest {
        [] => Ok(None),
        [Token::Word(path)] => Ok(Some(PathBuf::from(path))),
        [Token::Word(_), extra, ..] | [extra, ..] => {
            Err(CommandParseError::UnexpectedToken(extra.text().to_owned()))
        }
    }
}

fn check_limits(plan: &ExecutionPlan, limits: &Limits) -> Result<(), CommandParseError> {
    let commands = plan.commands();

    if commands.len() > limits.max_commands {
        return Err(CommandParseError::TooManyCommands {
            count: commands.len(),
            limit: limits.max_commands,
        });
    }

    if let Some(cmd) = commands
        .iter()
        .find(|cmd| cmd.args().len() > limits.max_arguments)
    {
        return Err(CommandParseError::TooManyArguments {
            program: cmd.program().to_owned(),
            count: cmd.args().len(),
            limit: limits.max_arguments,
        });
    }

    Ok(())
}
