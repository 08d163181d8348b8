#[peep_in]
pub struct Hotel {
    name: String,
    hotel_name: String,
    #[peep_in(customer = "self")]
    owner: String,
}

impl Hotel {
    pub const __NAME: &'static str = "legacy";
}

#[peep_in]
pub enum Room {
    Single,
}
