#[peep_in(level = "package")]
struct Guest {
    #[peep_in(level = "none")]
    id: u64,
    nick_name: String,
}
