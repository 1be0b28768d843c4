use std::io::Read;
use std::str::FromStr;

use crate::division::{Division, TeamRecord};
use crate::error::ParseError;

/// Whitespace separated tokens, each tagged with its 1-based line.
struct Tokens<'a> {
    inner: Box<dyn Iterator<Item = (usize, &'a str)> + 'a>,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens {
            inner: Box::new(
                text.lines()
                    .enumerate()
                    .flat_map(|(i, line)| line.split_whitespace().map(move |token| (i + 1, token))),
            ),
            last_line: 1,
        }
    }
    fn next(&mut self, field: &'static str) -> Result<(usize, &'a str), ParseError> {
        match self.inner.next() {
            Some((line, token)) => {
                self.last_line = line;
                Ok((line, token))
            }
            None => Err(ParseError::MissingField {
                line: self.last_line,
                field,
            }),
        }
    }
    fn count(&mut self, field: &'static str) -> Result<u32, ParseError> {
        let (line, token) = self.next(field)?;
        token.parse().map_err(|_| ParseError::InvalidNumber {
            line,
            field,
            token: token.to_owned(),
        })
    }
}

/// Reads a division in the form
///
/// ```text
/// 4
/// Atlanta       83 71  8  0 1 6 1
/// Philadelphia  80 79  3  1 0 0 2
/// New_York      78 78  6  6 0 0 0
/// Montreal      77 82  3  1 2 0 0
/// ```
///
/// a team count, then per team its name, wins, losses, remaining games and
/// the games left against each team in the same order.
pub fn parse_division(text: &str) -> Result<Division, ParseError> {
    let mut tokens = Tokens::new(text);
    let (line, header) = tokens.next("team count").map_err(|_| ParseError::Empty)?;
    let team_count: usize = header.parse().map_err(|_| ParseError::BadHeader {
        line,
        token: header.to_owned(),
    })?;

    let mut records = Vec::new();
    for found in 0..team_count {
        let name = match tokens.next("team name") {
            Ok((_, name)) => name.to_owned(),
            Err(_) => {
                return Err(ParseError::MissingTeams {
                    line: tokens.last_line,
                    expected: team_count,
                    found,
                })
            }
        };
        let wins = tokens.count("wins")?;
        let losses = tokens.count("losses")?;
        let remaining = tokens.count("remaining")?;
        let against = (0..team_count)
            .map(|_| tokens.count("games against"))
            .collect::<Result<Vec<u32>, ParseError>>()?;
        records.push(TeamRecord {
            name,
            wins,
            losses,
            remaining,
            against,
        });
    }
    if let Some((line, token)) = tokens.inner.next() {
        return Err(ParseError::TrailingData {
            line,
            token: token.to_owned(),
        });
    }
    Ok(Division::new(team_count, records)?)
}

impl FromStr for Division {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_division(s)
    }
}

impl Division {
    pub fn from_reader<R: Read>(mut reader: R) -> anyhow::Result<Division> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(parse_division(&text)?)
    }
}
