// Price data ingestion: CSV parsing and the sources the engine reads from
pub mod csv_parser;
pub mod market_data;
