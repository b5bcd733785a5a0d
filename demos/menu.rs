//! Interactive tester for a pooled list of strings.
//!
//! Run with `cargo run --example menu`; set `RUST_LOG=pooled_list=trace` to
//! watch slots being allocated and recycled.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use log::{debug, error};
use pooled_list::{InlineList, DEFAULT_CAPACITY};

type StringList = InlineList<String, DEFAULT_CAPACITY>;

const MENU: &str = "
=== Array-Based Linked List Tester ===
1. Insert Front
2. Delete Front
3. Insert After
4. Delete After
5. Traverse List
6. Size
7. Find
8. Clear List
9. Insert Sorted
10. Remove by Value
11. Sort List
12. Remove Duplicates (Unique)
0. Exit
Choice: ";

struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Prints `prompt` and reads one line, `None` on end of input.
    fn ask(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    fn ask_value(&mut self, prompt: &str) -> anyhow::Result<String> {
        self.ask(prompt)?.context("input ended while reading a value")
    }

    fn ask_position(&mut self, prompt: &str) -> anyhow::Result<usize> {
        let line = self.ask_value(prompt)?;
        line.trim()
            .parse()
            .with_context(|| format!("{:?} is not a position index", line))
    }

    fn show(&mut self, list: &StringList) -> io::Result<()> {
        writeln!(self.output, "{}", list)
    }

    /// Runs one menu choice, returning `false` once the user asks to exit.
    fn dispatch(&mut self, list: &mut StringList, choice: &str) -> anyhow::Result<bool> {
        match choice {
            "1" => {
                let value = self.ask_value("Enter value to insert at front: ")?;
                list.insert_front(value)?;
                self.show(list)?;
            }
            "2" => {
                list.delete_front()?;
                self.show(list)?;
            }
            "3" => {
                let position = self.ask_position("Enter position index: ")?;
                let prompt = format!("Enter value to insert after {}: ", position);
                let value = self.ask_value(&prompt)?;
                list.insert_after(position, value)?;
                self.show(list)?;
            }
            "4" => {
                let position = self.ask_position("Enter position index to delete after: ")?;
                list.delete_after(position)?;
                self.show(list)?;
            }
            "5" => self.show(list)?,
            "6" => writeln!(self.output, "Size: {}", list.len())?,
            "7" => {
                let value = self.ask_value("Enter value to find: ")?;
                match list.find(&value) {
                    Some(index) => writeln!(self.output, "Found at index: {}", index)?,
                    None => writeln!(self.output, "Value not found.")?,
                }
            }
            "8" => {
                list.clear();
                writeln!(self.output, "List cleared.")?;
                self.show(list)?;
            }
            "9" => {
                let value = self.ask_value("Enter value to insert sorted: ")?;
                list.insert_sorted(value)?;
                self.show(list)?;
            }
            "10" => {
                let value = self.ask_value("Enter value to remove: ")?;
                let message = if list.remove(&value) { "Removed." } else { "Not found." };
                writeln!(self.output, "{}", message)?;
                self.show(list)?;
            }
            "11" => {
                list.sort();
                writeln!(self.output, "List sorted.")?;
                self.show(list)?;
            }
            "12" => {
                let removed = list.dedup();
                debug!("dedup removed {} values", removed);
                writeln!(self.output, "Duplicates removed.")?;
                self.show(list)?;
            }
            "0" => {
                writeln!(self.output, "Exiting.")?;
                return Ok(false);
            }
            _ => writeln!(self.output, "Invalid choice.")?,
        }
        Ok(true)
    }

    fn run(&mut self, list: &mut StringList) -> anyhow::Result<()> {
        while let Some(choice) = self.ask(MENU)? {
            match self.dispatch(list, choice.trim()) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => writeln!(self.output, "Error: {}", err)?,
            }
        }
        Ok(())
    }
}

fn main() {
    env_logger::init();

    let stdin = io::stdin();
    let mut session = Session {
        input: stdin.lock(),
        output: io::stdout(),
    };

    let mut list = Box::new(StringList::new());
    if let Err(err) = session.run(&mut list) {
        error!("tester failed: {:#}", err);
        std::process::exit(1);
    }
}
