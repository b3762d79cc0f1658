pub mod pedido;
pub mod text;

pub use pedido::{respond_to_form, send_result, submit_form};
pub use text::{help, send_template};
