// src/menu.rs
// =============================================================================
// Interactive numbered menu.
//
// Each number maps to a MenuChoice, and each choice to a pipeline Action, at
// compile time. A failing choice prints its error and brings the menu back;
// only "0" (or end of input) leaves the loop.
// =============================================================================

use crate::cli::Action;
use crate::config::{DEFAULT_BOOK_URL, DEFAULT_CATEGORY_URL};
use crate::crawl::Crawler;
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Book,
    Category,
    All,
    AllWithImages,
    Quit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::Book,
        MenuChoice::Category,
        MenuChoice::All,
        MenuChoice::AllWithImages,
        MenuChoice::Quit,
    ];

    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|choice| choice.key() == input.trim())
    }

    pub fn key(self) -> &'static str {
        match self {
            MenuChoice::Book => "1",
            MenuChoice::Category => "2",
            MenuChoice::All => "3",
            MenuChoice::AllWithImages => "4",
            MenuChoice::Quit => "0",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Book => "Scrape one book",
            MenuChoice::Category => "Scrape one category",
            MenuChoice::All => "Scrape every category",
            MenuChoice::AllWithImages => "Scrape every category with cover images",
            MenuChoice::Quit => "Quit",
        }
    }

    pub fn action(self) -> Option<Action> {
        match self {
            MenuChoice::Book => Some(Action::Book(builtin_url(DEFAULT_BOOK_URL))),
            MenuChoice::Category => Some(Action::Category(builtin_url(DEFAULT_CATEGORY_URL))),
            MenuChoice::All => Some(Action::All),
            MenuChoice::AllWithImages => Some(Action::AllWithImages),
            MenuChoice::Quit => None,
        }
    }
}

fn builtin_url(raw: &str) -> Url {
    Url::parse(raw).expect("built-in URL is valid")
}

pub async fn run_menu(crawler: &Crawler, json: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("\n=== MENU ===");
        for choice in MenuChoice::ALL {
            println!("{} - {}", choice.key(), choice.label());
        }
        print!("Your choice: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match MenuChoice::parse(&line) {
            Some(MenuChoice::Quit) => {
                println!("Goodbye!");
                break;
            }
            Some(choice) => {
                if let Some(action) = choice.action() {
                    if let Err(e) = crate::run_action(crawler, action, json).await {
                        eprintln!("[ERROR] {}: {:#}", choice.label(), e);
                    }
                }
            }
            None => println!("Invalid choice, enter a number between 0 and 4."),
        }
    }

    Ok(())
}
