use evatr::*;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let client = Client::new()?;

    // ── 1. Simple confirmation ────────────────────────────────────────
    println!("=== Simple VAT ID Validation ===");
    match client.validate_vat("DE123456789", "ATU12345678").await {
        Ok(resp) if resp.is_valid() => {
            println!("  valid");
            println!("  validated at: {}", resp.request_timestamp);
            println!("  status: {}", resp.status);
        }
        Ok(resp) => {
            println!("  not valid: {}", resp.status);
            if let Some(from) = &resp.valid_from {
                println!("  valid from: {from}");
            }
            if let Some(until) = &resp.valid_until {
                println!("  valid until: {until}");
            }
        }
        Err(Error::Api(e)) => {
            println!("  validation error: {} (HTTP {})", e.message, e.status_code);
            println!("  status code: {}", e.status);
        }
        Err(e) => return Err(e),
    }

    // ── 2. Qualified confirmation ─────────────────────────────────────
    println!("\n=== Qualified VAT ID Validation ===");
    match client
        .validate_vat_qualified(
            "DE123456789",
            "ATU12345678",
            "Musterhaus GmbH & Co KG",
            "Musterort",
            "Musterstrasse 22",
            "12345",
        )
        .await
    {
        Ok(resp) if resp.is_valid() => {
            println!("  valid, status {}", resp.status);
            println!("  company data verification:");
            for (field, result) in resp.verification_results() {
                println!("    {}: {}", field_label(field), result_label(result));
            }
        }
        Ok(resp) => println!("  not valid: {}", resp.status),
        Err(Error::Api(e)) => {
            println!("  validation error: {} (HTTP {})", e.message, e.status_code)
        }
        Err(e) => return Err(e),
    }

    // ── 3. Member states ──────────────────────────────────────────────
    println!("\n=== EU Member States ===");
    let states = client.eu_member_states().await?;
    let available = states.iter().filter(|s| s.available).count();
    println!("  {} member states ({available} available)", states.len());
    for state in states.iter().take(5) {
        let status = if state.available { "available" } else { "unavailable" };
        println!("    {} ({}): {status}", state.name, state.alpha2);
    }
    if states.len() > 5 {
        println!("    ... and {} more", states.len() - 5);
    }

    Ok(())
}

fn field_label(field: CompanyField) -> &'static str {
    match field {
        CompanyField::CompanyName => "Company name",
        CompanyField::Street => "Street",
        CompanyField::PostalCode => "Postal code",
        CompanyField::City => "City",
    }
}

fn result_label(result: VerificationResult) -> &'static str {
    match result {
        VerificationResult::Match => "matches",
        VerificationResult::Mismatch => "does not match",
        VerificationResult::NotRequested => "not requested",
        VerificationResult::NotProvided => "not provided by member state",
        VerificationResult::Other(_) => "unknown result code",
    }
}
