//! Corpus input: plain-text files, one document per line, read in batches.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::PathBuf;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// One or more plain-text corpus files, one document per line.
/// Files are read in the order given; iteration is restartable.
#[derive(Debug, Clone)]
pub struct Corpus {
    paths: Vec<PathBuf>,
}

impl Corpus {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Total number of documents, counted in a separate pass over the files.
    pub fn doc_count(&self) -> io::Result<usize> {
        let mut count = 0;
        for path in &self.paths {
            let reader = BufReader::new(File::open(path)?);
            for line in reader.lines() {
                line?;
                count += 1;
            }
        }
        Ok(count)
    }

    /// Iterate the corpus in groups of at most `batch_size` documents.
    /// The last group may be short. Each call starts over from the first file.
    pub fn batches(&self, batch_size: usize) -> Batches {
        Batches {
            paths: self.paths.clone(),
            next: 0,
            lines: None,
            batch_size: batch_size.max(1),
        }
    }
}

/// Pull-based iterator over document groups.
pub struct Batches {
    paths: Vec<PathBuf>,
    next: usize,
    lines: Option<Lines<BufReader<File>>>,
    batch_size: usize,
}

impl Iterator for Batches {
    type Item = io::Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut batch = Vec::with_capacity(self.batch_size);
        loop {
            match &mut self.lines {
                Some(lines) => match lines.next() {
                    Some(Ok(line)) => {
                        batch.push(line);
                        if batch.len() == self.batch_size {
                            return Some(Ok(batch));
                        }
                    }
                    Some(Err(e)) => {
                        self.next = self.paths.len();
                        self.lines = None;
                        return Some(Err(e));
                    }
                    None => self.lines = None,
                },
                None => {
                    if self.next == self.paths.len() {
                        break;
                    }
                    match File::open(&self.paths[self.next]) {
                        Ok(file) => {
                            self.next += 1;
                            self.lines = Some(BufReader::new(file).lines());
                        }
                        Err(e) => {
                            self.next = self.paths.len();
                            return Some(Err(e));
                        }
                    }
                }
            }
        }
        if batch.is_empty() {
            None
        } else {
            Some(Ok(batch))
        }
    }
}
