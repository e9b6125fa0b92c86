//! Plain-text rendering of user records.
//!
//! Decrypted secrets are displayed here and nowhere else; callers print
//! the result and discard the records.

use uservault_core::UserRecord;

pub fn print_records(records: &[UserRecord], quiet: bool) {
    if !quiet {
        println!("ID | USERNAME | EMAIL | SECRET");
    }
    for record in records {
        println!(
            "{} | {} | {} | {}",
            record.id, record.username, record.email, record.secret
        );
    }
}

pub fn print_record(record: &UserRecord) {
    println!("ID: {}", record.id);
    println!("Username: {}", record.username);
    println!("Email: {}", record.email);
    println!("Secret: {}", record.secret);
}
