use anyhow::Result;
use colored::Colorize;
use tracing::info;

use ai_pricing_calculator::{error::LeadError, lead::LeadCapture};

/// Execute the subscribe command
///
/// Invalid addresses are reported inline; a failed submission is reported
/// as a separate notice. Neither is fatal to the process exit code.
pub async fn execute(email: &str) -> Result<()> {
    println!("{}", "Sending your detailed AI pricing guide...".yellow());

    let capture = LeadCapture::new();
    let result = capture
        .submit(email, |email| {
            println!("{}", "✓ Success!".green());
            println!("  Your detailed AI pricing guide is on its way to {}", email.cyan());
        })
        .await;

    if let Err(e) = &result {
        info!(kind = e.kind(), "Lead capture did not complete");
    }

    match result {
        Ok(()) => {}
        Err(LeadError::InvalidEmail(msg)) => {
            println!("{} {}", "Invalid email:".red(), msg);
        }
        Err(e @ LeadError::Submission(_)) => {
            println!("{}", "Something went wrong".red().bold());
            println!("  {}", e);
        }
    }

    Ok(())
}
