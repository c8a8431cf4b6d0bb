//! Query one SBC resource and print its decoded envelope as JSON
//!
//! Usage: cargo run -p ribbon-client --example dump_table -- <host> <username> <password> [resource]

use ribbon_client::{logging, ClientError, SbcClient};

fn main() -> Result<(), ClientError> {
    logging::init_logging_from_env().ok();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "192.168.1.1".to_string());
    let username = args.next().unwrap_or_else(|| "rest_user".to_string());
    let password = args.next().unwrap_or_default();
    let resource = args.next().unwrap_or_else(|| "sipservertable".to_string());

    let mut sbc = SbcClient::new(&host, &username, &password, false);
    eprintln!("{}", sbc.open()?);

    let response = sbc.query(&resource, Some("true"), None)?;
    let document = response.decode()?;
    println!("{}", serde_json::to_string_pretty(&document).unwrap());

    eprintln!("{}", sbc.close()?);
    Ok(())
}
