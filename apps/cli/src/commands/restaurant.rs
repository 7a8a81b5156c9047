//! `splitbill restaurant`: the stored restaurant list used for scoping.

use chrono::NaiveDate;
use clap::Subcommand;
use comfy_table::{Cell, Table};
use splitbill_store::{AppConfig, StoreResult};

use crate::session::Session;

#[derive(Debug, Subcommand)]
pub enum RestaurantCommand {
    /// List stored restaurants
    List,
    /// Add a restaurant
    Add { name: String },
    /// Remove a restaurant (menu items keep their restaurant id)
    Remove { id: String },
}

pub async fn run(command: RestaurantCommand, config: &AppConfig, today: NaiveDate) -> StoreResult<()> {
    let mut session = Session::open(config, today).await?;

    match command {
        RestaurantCommand::List => {
            let mut table = Table::new();
            table.set_header(vec![Cell::new("ID"), Cell::new("Name"), Cell::new("Items")]);
            for restaurant in &session.state.restaurants {
                let items = session
                    .state
                    .menu_items
                    .iter()
                    .filter(|item| item.belongs_to(&restaurant.id))
                    .count();
                table.add_row(vec![
                    Cell::new(&restaurant.id),
                    Cell::new(&restaurant.name),
                    Cell::new(items),
                ]);
            }
            println!("{table}");
        }

        RestaurantCommand::Add { name } => {
            let restaurant = session.state.add_restaurant(&name)?;
            println!("Added '{}' ({})", restaurant.name, restaurant.id);
            session.commit().await?;
        }

        RestaurantCommand::Remove { id } => {
            let removed = session.state.remove_restaurant(&id)?;
            println!("Removed '{}'", removed.name);
            session.commit().await?;
        }
    }

    session.close().await
}
