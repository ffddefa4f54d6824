/// Loads variables from a `.env` file in the working directory, if there is one.
pub fn init() {
    dotenv::dotenv().ok();
}
