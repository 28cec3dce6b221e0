#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum MainMenu {
    Signup,
    Login,
    Exit,
}

impl MainMenu {
    pub const TEXT: &'static str = "\nWelcome to Social Network\n1. Signup\n2. Login\n3. Exit\n";

    pub fn from(input: impl AsRef<str>) -> Option<Self> {
        match input.as_ref().trim() {
            "1" => Some(Self::Signup),
            "2" => Some(Self::Login),
            "3" => Some(Self::Exit),
            _ => None,
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Dashboard {
    CreatePost,
    ViewPosts,
    AddComment,
    SendFriendRequest,
    HandleFriendRequests,
    ViewFriends,
    Logout,
}

impl Dashboard {
    pub const TEXT: &'static str = "\nDashboard:\n1. Create Post\n2. View Posts\n3. Add Comment\n4. Send Friend Request\n5. Handle Friend Requests\n6. View Friends\n7. Logout\n";

    pub fn from(input: impl AsRef<str>) -> Option<Self> {
        match input.as_ref().trim() {
            "1" => Some(Self::CreatePost),
            "2" => Some(Self::ViewPosts),
            "3" => Some(Self::AddComment),
            "4" => Some(Self::SendFriendRequest),
            "5" => Some(Self::HandleFriendRequests),
            "6" => Some(Self::ViewFriends),
            "7" => Some(Self::Logout),
            _ => None,
        }
    }
}
