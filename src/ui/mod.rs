pub mod badges;
pub mod confirm_dialog;
pub mod header;
pub mod server_form;
pub mod server_list;
pub mod toast;
