//! Router and handlers for the gateway service, exposed as a library so
//! integration tests can drive the app without binding a socket.

pub mod routes;
