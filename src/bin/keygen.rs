//! Generate an admin API key for privileged endpoints.
//!
//! Prints the plaintext key once; only hand the plaintext to the server
//! via `ADMIN_API_KEY`.

use mintgate::auth::ApiKeyValidator;

fn main() {
    let (key, hash) = ApiKeyValidator::generate_key();

    println!("API key:  {key}");
    println!("SHA-256:  {hash}");
}
