#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    // Opens the session: picks the settings and tells them to every peer that connects. Plays the
    // color chosen in the settings.
    Host,

    // Joins a host and takes the color the host did not pick. Has no say in the settings.
    Guest,
}
