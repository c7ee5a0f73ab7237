pub mod banner;
pub mod roster_list;
