pub mod configuration;

pub mod fitting {
    pub mod leastsquares;
}

pub mod math {
    pub mod bspline {
        pub mod uniformbasis;
        pub mod knotaxis;
        pub mod bspline;
    }
}

pub mod objectwithuuid;

pub mod spline {
    pub mod splineerror;
    pub mod controlpoint;
    pub mod trajectoryspline;
    pub mod vectorspacespline;
}

pub mod time {
    pub mod utility;
    pub mod duration;
    pub mod time;
    pub mod timesource;
}
