//! Line-driven widget session.
//!
//! Plain lines are typed into the search input. Lines starting with `:` are
//! keys and pointer events: `:up`, `:down`, `:enter`, `:tab`, `:esc`,
//! `:click N`, `:focus`, `:away`, `:country CODE`, `:quit`.

use addresslookup_core::prelude::*;
use std::io::{self, BufRead, Write};

/// Key names understood by the default keymap.
const KEY_ALIASES: &[(&str, &str)] = &[
    (":up", "ArrowUp"),
    (":down", "ArrowDown"),
    (":enter", "Enter"),
    (":tab", "Tab"),
    (":esc", "Escape"),
];

pub fn run<S: LookupService>(driver: &mut BlockingDriver<S>) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print_effects(&driver.start());
    println!("Type an address (3+ characters). :help for commands.");

    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);

        let effects = if let Some(command) = line.strip_prefix(':') {
            let mut parts = command.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("quit" | "q"), _) => break,
                (Some("help"), _) => {
                    println!(":up :down :enter :tab :esc :click N :focus :away :country CODE :quit");
                    continue;
                }
                (Some("click"), Some(n)) => match n.parse::<usize>() {
                    Ok(row) => driver.select_row(row),
                    Err(_) => {
                        eprintln!("not a row number: {n}");
                        continue;
                    }
                },
                (Some("focus"), _) => driver.focus(),
                (Some("away"), _) => driver.outside_click(),
                (Some("country"), Some(code)) => {
                    driver.country_changed(code);
                    println!("country: {}", driver.session().country());
                    continue;
                }
                _ => match KEY_ALIASES.iter().find(|(alias, _)| *alias == line) {
                    Some((_, key)) => driver.key(key).0,
                    None => {
                        eprintln!("unknown command: {line}");
                        continue;
                    }
                },
            }
        } else {
            driver.search(line)
        };

        print_effects(&effects);
    }
    Ok(())
}

fn print_effects(effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::Render { rows } => {
                for (i, row) in rows.iter().enumerate() {
                    let marker = if row.selected { '>' } else { ' ' };
                    println!("{marker} {i:>2}  {}", row.text());
                }
            }
            Effect::Hide => println!("(suggestions hidden)"),
            Effect::SetInputText { text } => println!("input: {text}"),
            Effect::SetCountry { code } => println!("country: {code}"),
            Effect::WriteField(write) => println!("  {:<13} {}", write.selector, write.value),
            Effect::Report(diagnostic) => eprintln!("! {}", diagnostic.message),
            _ => {}
        }
    }
}
