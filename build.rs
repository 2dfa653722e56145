fn main() {
    // Migrations are embedded with sqlx::migrate!, so a new or edited
    // migration file has to trigger a rebuild
    println!("cargo:rerun-if-changed=migrations");
}
