/*!
Command line inputs and outputs, where `-` names stdin or stdout
*/

use std::fs;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    /// Open the input for incremental reading
    pub fn open(&self) -> io::Result<Box<dyn BufRead>> {
        let reader: Box<dyn BufRead> = match self {
            Input::Stdin => Box::new(io::stdin().lock()),
            Input::File(path) => Box::new(BufReader::new(fs::File::open(path)?)),
        };
        Ok(reader)
    }

    pub fn read_all(&self) -> io::Result<Vec<u8>> {
        let mut data = Vec::new();
        self.open()?.read_to_end(&mut data)?;
        Ok(data)
    }

    pub fn read_to_string(&self) -> io::Result<String> {
        String::from_utf8(self.read_all()?)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[derive(Debug, Clone)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

impl Output {
    pub fn write_all(&self, data: &[u8]) -> io::Result<()> {
        match self {
            Output::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(data)?;
                stdout.flush()
            }
            Output::File(path) => fs::write(path, data),
        }
    }

    /// Write text, newline-terminated on stdout
    pub fn write_line(&self, text: &str) -> io::Result<()> {
        match self {
            Output::Stdout => self.write_all(format!("{text}\n").as_bytes()),
            Output::File(_) => self.write_all(text.as_bytes()),
        }
    }
}

fn is_std_stream(s: &str) -> bool {
    s == "-"
}

impl FromStr for Input {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if is_std_stream(s) {
            Input::Stdin
        } else {
            Input::File(s.into())
        })
    }
}

impl FromStr for Output {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if is_std_stream(s) {
            Output::Stdout
        } else {
            Output::File(s.into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_is_std_stream() {
        assert!(matches!("-".parse::<Input>(), Ok(Input::Stdin)));
        assert!(matches!("-".parse::<Output>(), Ok(Output::Stdout)));
        match "data.torrent".parse::<Input>() {
            Ok(Input::File(path)) => assert_eq!(path, PathBuf::from("data.torrent")),
            r => panic!("Unexpected input {r:?}"),
        }
    }
}
