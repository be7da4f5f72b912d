use salesboard_lib::ErrorPayload;

fn main() {
    env_logger::init();

    match salesboard_lib::run() {
        Ok(snapshot) => match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Failed to serialize snapshot: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            let payload = ErrorPayload::from(&e);
            log::error!("{} ({})", payload.message, payload.recovery_suggestion);
            std::process::exit(1);
        }
    }
}
