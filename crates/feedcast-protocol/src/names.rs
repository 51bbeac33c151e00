// Event names — must match what the feed front-end emits and listens for.

// client → server
pub const HELLO: &str = "hello";
pub const LIKE_UPDATED_FROM_CLIENT: &str = "like_updated_from_client";
pub const NEW_POST_FROM_CLIENT: &str = "new_post_from_client";
pub const NEW_COMMENT_FROM_CLIENT: &str = "new_comment_from_client";
pub const DELETE_POST_FROM_CLIENT: &str = "delete_post_from_client";

// server → client
pub const HELLO_FROM_SERVER: &str = "helloFromServer";
pub const LIKE_UPDATED: &str = "like_updated";
pub const POST_CREATED: &str = "post_created";
pub const COMMENT_ADDED: &str = "comment_added";
pub const POST_DELETED: &str = "post_deleted";
