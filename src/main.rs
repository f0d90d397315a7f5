mod art;
mod artists;
mod confidence;
mod config;
mod dedup;
mod deluxe;
mod donor;
mod library;
mod runtime;
mod tags;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
