//! Front-ends which gather a [`RawInput`] for publishing. Nothing here
//! validates the fields; see [`crate::publish`].

use crate::post::RawInput;
use std::io::{self, BufRead, Write};

/// Gathers the raw form fields for one post. Returns `Ok(None)` if the user
/// cancelled.
pub trait Collector {
    fn collect(&mut self) -> io::Result<Option<RawInput>>;
}

/// A collector for fields which were already supplied up front, e.g. as
/// command-line options.
pub struct Given(pub RawInput);

impl Collector for Given {
    fn collect(&mut self) -> io::Result<Option<RawInput>> {
        Ok(Some(self.0.clone()))
    }
}

/// Labels for the single-line fields, in the order they're asked for.
const FIELD_LABELS: [&str; 5] = [
    "Title",
    "Category",
    "Image URL",
    "Description",
    "Popularity (1-100)",
];

/// The line which ends the multi-line content block in a [`Prompt`].
pub const CONTENT_TERMINATOR: &str = ".";

/// An interactive form. Prompts for each single-line field in turn and then
/// reads the content block until a line holding only [`CONTENT_TERMINATOR`]
/// or the end of input. Running out of input before the content block
/// cancels the form.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompt { input, output }
    }

    // Returns `None` at end of input.
    fn field(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(chomp(&line).to_owned()))
    }

    fn content(&mut self) -> io::Result<String> {
        writeln!(
            self.output,
            "Content (HTML), finish with a line containing only `{}`:",
            CONTENT_TERMINATOR
        )?;
        self.output.flush()?;

        let mut lines: Vec<String> = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            let line = chomp(&line);
            if line == CONTENT_TERMINATOR {
                break;
            }
            lines.push(line.to_owned());
        }
        Ok(lines.join("\n"))
    }
}

impl<R: BufRead, W: Write> Collector for Prompt<R, W> {
    fn collect(&mut self) -> io::Result<Option<RawInput>> {
        let mut fields: [String; 5] = Default::default();
        for (label, value) in FIELD_LABELS.iter().zip(fields.iter_mut()) {
            match self.field(label)? {
                Some(answer) => *value = answer,
                None => return Ok(None),
            }
        }
        let [title, category, image, description, popularity] = fields;
        let content = self.content()?;

        Ok(Some(RawInput {
            title,
            category,
            image,
            description,
            popularity,
            content,
        }))
    }
}

fn chomp(line: &str) -> &str {
    line.trim_end_matches('\n').trim_end_matches('\r')
}
