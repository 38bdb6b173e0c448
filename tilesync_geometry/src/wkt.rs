//! A reader for the polygon subset of Well-Known Text.
//!
//! Only `POLYGON` and `MULTIPOLYGON` are accepted, with 2D coordinates. Both return a
//! [`MultiPolygon`] so that callers handle a single shape type.

use anyhow::{Result, anyhow, bail, ensure};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use regex::Regex;
use std::{iter::Peekable, sync::LazyLock, vec::IntoIter};
use tilesync_derive::context;

static TOKEN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[A-Za-z]+|\(|\)|,|[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?|\S").unwrap());

#[derive(Clone, Debug, PartialEq)]
enum Token {
	Word(String),
	Open,
	Close,
	Comma,
	Number(f64),
}

type Tokens = Peekable<IntoIter<Token>>;

fn tokenize(text: &str) -> Result<Vec<Token>> {
	TOKEN
		.find_iter(text)
		.map(|m| {
			let s = m.as_str();
			Ok(match s {
				"(" => Token::Open,
				")" => Token::Close,
				"," => Token::Comma,
				_ if s.chars().all(|c| c.is_ascii_alphabetic()) => Token::Word(s.to_ascii_uppercase()),
				_ => Token::Number(s.parse().map_err(|_| anyhow!("unexpected '{s}' at offset {}", m.start()))?),
			})
		})
		.collect()
}

/// Parses a WKT `POLYGON` or `MULTIPOLYGON`.
#[context("parsing WKT {:?}", text)]
pub fn parse_wkt(text: &str) -> Result<MultiPolygon<f64>> {
	let mut tokens = tokenize(text)?.into_iter().peekable();
	let result = match tokens.next() {
		Some(Token::Word(word)) if word == "POLYGON" => MultiPolygon::new(vec![parse_polygon(&mut tokens)?]),
		Some(Token::Word(word)) if word == "MULTIPOLYGON" => {
			MultiPolygon::new(parse_list(&mut tokens, parse_polygon)?)
		}
		Some(Token::Word(word)) => bail!("geometry type '{word}' is not supported, expected POLYGON or MULTIPOLYGON"),
		other => bail!("expected a geometry type, found {other:?}"),
	};
	ensure!(tokens.next().is_none(), "unexpected text after the geometry");
	Ok(result)
}

fn expect(tokens: &mut Tokens, expected: &Token) -> Result<()> {
	match tokens.next() {
		Some(token) if &token == expected => Ok(()),
		other => bail!("expected {expected:?}, found {other:?}"),
	}
}

/// `( item, item, ... )`
fn parse_list<T>(tokens: &mut Tokens, item: fn(&mut Tokens) -> Result<T>) -> Result<Vec<T>> {
	expect(tokens, &Token::Open)?;
	let mut items = vec![item(tokens)?];
	while tokens.next_if_eq(&Token::Comma).is_some() {
		items.push(item(tokens)?);
	}
	expect(tokens, &Token::Close)?;
	Ok(items)
}

fn parse_polygon(tokens: &mut Tokens) -> Result<Polygon<f64>> {
	let mut rings = parse_list(tokens, parse_ring)?.into_iter();
	let exterior = rings.next().ok_or_else(|| anyhow!("polygon has no rings"))?;
	Ok(Polygon::new(exterior, rings.collect()))
}

fn parse_ring(tokens: &mut Tokens) -> Result<LineString<f64>> {
	let coords = parse_list(tokens, parse_coord)?;
	ensure!(coords.len() >= 4, "a ring needs at least 4 points, found {}", coords.len());
	ensure!(coords.first() == coords.last(), "ring is not closed");
	Ok(LineString::new(coords))
}

fn parse_coord(tokens: &mut Tokens) -> Result<Coord<f64>> {
	let mut number = || match tokens.next() {
		Some(Token::Number(value)) => Ok(value),
		other => bail!("expected a number, found {other:?}"),
	};
	let x = number()?;
	let y = number()?;
	Ok(Coord { x, y })
}
