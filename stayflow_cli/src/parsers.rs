use stayflow_optimizer::flow::flow_model::ArcObjective;

pub fn parse_objective(input: &str) -> Result<ArcObjective, String> {
    input.trim().to_ascii_lowercase().replace('_', "-").parse()
}

pub fn parse_stay_days(input: &str) -> Result<i64, String> {
    match input.trim().parse::<i64>() {
        Ok(days) if days >= 0 => Ok(days),
        Ok(_) => Err(String::from("Stay days cannot be negative")),
        Err(_) => Err(String::from("Invalid number of days")),
    }
}
