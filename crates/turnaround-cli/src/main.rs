mod command;
mod data;
mod report;
mod schema;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
