//! Parser for the CSG scene description language.
//!
//! The language is line-oriented only in spirit: whitespace is
//! insignificant and `#` starts a comment running to the end of the
//! line. Three statement forms exist:
//!
//! ```text
//! object lens = intersect(sphere(12), xtranslate(-9, sphere(12)))
//! material glass
//! build lens glass
//! ```
//!
//! `material` declarations are labeled 2, 3, ... in declaration order;
//! `build` registers a named object as a top-level with a named
//! material. Expressions are primitives (`sphere`, `cube`), boolean
//! combinators (`unite`, `intersect`, `subtract`), transforms
//! (`scale`, `rotate`, `translate` and their twelve single-axis
//! shorthands), or references to previously defined objects. Vector
//! literals are written `{x, y, z}`; rotation angles are in degrees.
//!
//! Errors are reported with their line number and leave no scene
//! behind.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

use crate::math::Vec3;
use crate::scene::{Object, Scene};
use crate::voxel::Material;

/// A failure to parse a scene description.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: unexpected character `{found}`")]
    UnexpectedCharacter { line: u32, found: char },

    #[error("line {line}: malformed number `{text}`")]
    MalformedNumber { line: u32, text: String },

    #[error("line {line}: expected {expected}, found {found}")]
    Unexpected {
        line: u32,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: undefined object `{name}`")]
    UndefinedObject { line: u32, name: String },

    #[error("line {line}: undefined material `{name}`")]
    UndefinedMaterial { line: u32, name: String },

    #[error("line {line}: material label space exhausted")]
    TooManyMaterials { line: u32 },
}

/// Parse a scene description into a fresh [`Scene`].
pub fn parse(input: &str) -> Result<Scene, ParseError> {
    Parser::new(input).run()
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f32),
    Ident(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Equals,
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number `{n}`"),
            Token::Ident(name) => format!("`{name}`"),
            Token::LParen => "`(`".into(),
            Token::RParen => "`)`".into(),
            Token::LBrace => "`{`".into(),
            Token::RBrace => "`}`".into(),
            Token::Comma => "`,`".into(),
            Token::Equals => "`=`".into(),
            Token::Eof => "end of input".into(),
        }
    }
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: u32,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
            line: 1,
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        // Skip whitespace and comments, tracking line numbers.
        loop {
            match self.chars.peek() {
                Some('\n') => {
                    self.line += 1;
                    self.chars.next();
                }
                Some(c) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some('#') => {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                _ => break,
            }
        }

        let c = match self.chars.peek() {
            Some(&c) => c,
            None => return Ok(Token::Eof),
        };

        match c {
            '(' | ')' | '{' | '}' | ',' | '=' => {
                self.chars.next();
                Ok(match c {
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    '{' => Token::LBrace,
                    '}' => Token::RBrace,
                    ',' => Token::Comma,
                    _ => Token::Equals,
                })
            }
            '-' | '.' => self.number(),
            c if c.is_ascii_digit() => self.number(),
            c if c == '_' || c.is_alphabetic() => self.ident(),
            found => Err(ParseError::UnexpectedCharacter {
                line: self.line,
                found,
            }),
        }
    }

    fn number(&mut self) -> Result<Token, ParseError> {
        let mut text = String::new();
        if self.chars.peek() == Some(&'-') {
            text.push('-');
            self.chars.next();
        }
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                text.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        text.parse::<f32>()
            .map(Token::Number)
            .map_err(|_| ParseError::MalformedNumber {
                line: self.line,
                text,
            })
    }

    fn ident(&mut self) -> Result<Token, ParseError> {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c == '_' || c.is_alphanumeric() {
                name.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        Ok(Token::Ident(name))
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    scene: Scene,
    objects: HashMap<String, Object>,
    materials: HashMap<String, Material>,
    next_label: u32,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input),
            current: Token::Eof,
            scene: Scene::new(),
            objects: HashMap::new(),
            materials: HashMap::new(),
            // 0 and 1 are reserved for the unknown and void materials.
            next_label: Material::VOID.label() + 1,
        }
    }

    fn run(mut self) -> Result<Scene, ParseError> {
        self.advance()?;
        while self.current != Token::Eof {
            self.statement()?;
        }
        Ok(self.scene)
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn unexpected<T>(&self, expected: &'static str) -> Result<T, ParseError> {
        Err(ParseError::Unexpected {
            line: self.lexer.line,
            expected,
            found: self.current.describe(),
        })
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<(), ParseError> {
        if self.current != token {
            return self.unexpected(expected);
        }
        self.advance()
    }

    fn expect_number(&mut self) -> Result<f32, ParseError> {
        match self.current {
            Token::Number(value) => {
                self.advance()?;
                Ok(value)
            }
            _ => self.unexpected("a number"),
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match std::mem::replace(&mut self.current, Token::Eof) {
            Token::Ident(name) => {
                self.advance()?;
                Ok(name)
            }
            other => {
                self.current = other;
                self.unexpected("an identifier")
            }
        }
    }

    fn statement(&mut self) -> Result<(), ParseError> {
        let keyword = match &self.current {
            Token::Ident(name) => name.clone(),
            _ => return self.unexpected("`object`, `material` or `build`"),
        };
        match keyword.as_str() {
            "object" => {
                self.advance()?;
                let name = self.expect_ident()?;
                self.expect(Token::Equals, "`=`")?;
                let object = self.expression()?;
                self.objects.insert(name, object);
            }
            "material" => {
                self.advance()?;
                let name = self.expect_ident()?;
                if self.next_label > Material::MAX {
                    return Err(ParseError::TooManyMaterials {
                        line: self.lexer.line,
                    });
                }
                self.materials.insert(name, Material::new(self.next_label));
                self.next_label += 1;
            }
            "build" => {
                self.advance()?;
                let line = self.lexer.line;
                let object_name = self.expect_ident()?;
                let material_name = self.expect_ident()?;
                let object = *self.objects.get(&object_name).ok_or(
                    ParseError::UndefinedObject {
                        line,
                        name: object_name,
                    },
                )?;
                let material = *self.materials.get(&material_name).ok_or(
                    ParseError::UndefinedMaterial {
                        line,
                        name: material_name,
                    },
                )?;
                self.scene.toplevel(object, material);
            }
            _ => return self.unexpected("`object`, `material` or `build`"),
        }
        Ok(())
    }

    fn expression(&mut self) -> Result<Object, ParseError> {
        let line = self.lexer.line;
        let name = self.expect_ident()?;
        match name.as_str() {
            "sphere" => {
                let radius = self.unary_number()?;
                Ok(self.scene.sphere(radius))
            }
            "cube" => {
                let side = self.unary_number()?;
                Ok(self.scene.cube(side))
            }

            "unite" | "intersect" | "subtract" => {
                self.expect(Token::LParen, "`(`")?;
                let left = self.expression()?;
                self.expect(Token::Comma, "`,`")?;
                let right = self.expression()?;
                self.expect(Token::RParen, "`)`")?;
                Ok(match name.as_str() {
                    "unite" => self.scene.unite(left, right),
                    "intersect" => self.scene.intersect(left, right),
                    _ => self.scene.subtract(left, right),
                })
            }

            "scale" => {
                self.expect(Token::LParen, "`(`")?;
                let factors = if self.current == Token::LBrace {
                    self.vector()?
                } else {
                    let f = self.expect_number()?;
                    Vec3::new(f, f, f)
                };
                let child = self.rest_of_transform()?;
                Ok(self.scene.scale3(factors, child))
            }
            "rotate" => {
                self.expect(Token::LParen, "`(`")?;
                let degrees = self.expect_number()?;
                self.expect(Token::Comma, "`,`")?;
                let axis = self.vector()?;
                let child = self.rest_of_transform()?;
                Ok(self.scene.rotate(degrees, axis, child))
            }
            "translate" => {
                self.expect(Token::LParen, "`(`")?;
                let offset = self.vector()?;
                let child = self.rest_of_transform()?;
                Ok(self.scene.translate(offset, child))
            }

            "xscale" | "yscale" | "zscale" => {
                self.expect(Token::LParen, "`(`")?;
                let factor = self.expect_number()?;
                let mut factors = Vec3::new(1.0, 1.0, 1.0);
                factors[axis_of(&name)] = factor;
                let child = self.rest_of_transform()?;
                Ok(self.scene.scale3(factors, child))
            }
            "xrotate" | "yrotate" | "zrotate" => {
                self.expect(Token::LParen, "`(`")?;
                let degrees = self.expect_number()?;
                let mut axis = Vec3::zeros();
                axis[axis_of(&name)] = 1.0;
                let child = self.rest_of_transform()?;
                Ok(self.scene.rotate(degrees, axis, child))
            }
            "xtranslate" | "ytranslate" | "ztranslate" => {
                self.expect(Token::LParen, "`(`")?;
                let distance = self.expect_number()?;
                let mut offset = Vec3::zeros();
                offset[axis_of(&name)] = distance;
                let child = self.rest_of_transform()?;
                Ok(self.scene.translate(offset, child))
            }

            _ => match self.objects.get(&name) {
                Some(&object) => Ok(object),
                None => Err(ParseError::UndefinedObject { line, name }),
            },
        }
    }

    /// `( NUMBER )` after a primitive name.
    fn unary_number(&mut self) -> Result<f32, ParseError> {
        self.expect(Token::LParen, "`(`")?;
        let value = self.expect_number()?;
        self.expect(Token::RParen, "`)`")?;
        Ok(value)
    }

    /// `, expression )` after a transform's parameters.
    fn rest_of_transform(&mut self) -> Result<Object, ParseError> {
        self.expect(Token::Comma, "`,`")?;
        let child = self.expression()?;
        self.expect(Token::RParen, "`)`")?;
        Ok(child)
    }

    /// `{ NUMBER , NUMBER , NUMBER }`.
    fn vector(&mut self) -> Result<Vec3, ParseError> {
        self.expect(Token::LBrace, "`{`")?;
        let x = self.expect_number()?;
        self.expect(Token::Comma, "`,`")?;
        let y = self.expect_number()?;
        self.expect(Token::Comma, "`,`")?;
        let z = self.expect_number()?;
        self.expect(Token::RBrace, "`}`")?;
        Ok(Vec3::new(x, y, z))
    }
}

fn axis_of(name: &str) -> usize {
    match name.as_bytes()[0] {
        b'x' => 0,
        b'y' => 1,
        _ => 2,
    }
}
