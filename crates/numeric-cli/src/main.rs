mod command;
mod data;
mod schema;
mod terminal;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
