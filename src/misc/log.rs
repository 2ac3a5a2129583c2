pub mod targets {
    pub const DECLARE: &str = "declare";
    pub const ACCEPT: &str = "accept";
    pub const REPAIR: &str = "repair";
    pub const QUERY: &str = "query";
}
